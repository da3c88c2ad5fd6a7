use sapper_protocol::GameStatus;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BannerKind {
    Win,
    Lose,
}

impl BannerKind {
    pub(crate) const fn class(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Banner {
    pub kind: BannerKind,
    pub text: &'static str,
}

/// UI facts derived from the reported status alone, recomputed on every
/// render. The match is exhaustive: there is no wildcard arm for a status
/// this client does not know.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Presentation {
    pub overlay: bool,
    pub banner: Option<Banner>,
    pub show_continue: bool,
    pub abort_enabled: bool,
}

impl Presentation {
    pub(crate) fn for_status(status: GameStatus) -> Self {
        use GameStatus::*;
        match status {
            Active => Self {
                overlay: false,
                banner: None,
                show_continue: false,
                abort_enabled: true,
            },
            Won => Self {
                overlay: false,
                banner: Some(Banner {
                    kind: BannerKind::Win,
                    text: "Victory",
                }),
                show_continue: true,
                abort_enabled: false,
            },
            Lost => Self {
                overlay: false,
                banner: Some(Banner {
                    kind: BannerKind::Lose,
                    text: "You lose",
                }),
                show_continue: true,
                abort_enabled: false,
            },
            Abandoned | Error => Self {
                overlay: true,
                banner: None,
                show_continue: false,
                abort_enabled: false,
            },
        }
    }
}
