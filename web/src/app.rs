use sapper_protocol::{Coord, GameSnapshot, MoveRequest, StartRequest};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::board::{self, CellAction, CellMsg, CellView};
use crate::identity::Identity;
use crate::presentation::Presentation;
use crate::remote::{ApiError, GameClient};
use crate::utils::format_for_counter;

/// Largest accepted board edge for a new game, checked before any request
/// leaves the client. The service enforces its own bound on top.
pub(crate) const MAX_DIM: Coord = 40;

fn validate_start(width: Coord, height: Coord) -> Result<(), String> {
    if width > MAX_DIM || height > MAX_DIM {
        Err(format!("board dimensions must be at most {MAX_DIM}"))
    } else {
        Ok(())
    }
}

/// Orders snapshot adoption across overlapping round trips: every request
/// takes a ticket, and a response is rendered only if nothing newer has
/// been rendered already.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct SnapshotGate {
    next_seq: u64,
    applied_seq: u64,
}

impl SnapshotGate {
    fn issue(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn admit(&mut self, seq: u64) -> bool {
        if seq >= self.applied_seq {
            self.applied_seq = seq;
            true
        } else {
            false
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Load,
    Start(StartRequest),
    Reveal(MoveRequest),
    Flag(MoveRequest),
    Abandon,
}

pub(crate) enum Msg {
    Cell(CellMsg),
    StartNew,
    Abandon,
    ContinueAfterResult,
    Done(Op, u64, Result<Box<GameSnapshot>, ApiError>),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    pub api_base: AttrValue,
    pub assets_base: AttrValue,
}

/// Root component. Owns the single latest snapshot, the identity-bearing
/// client and the overlay/error state; everything drawn is a projection of
/// those.
pub(crate) struct GameView {
    client: GameClient,
    snapshot: Option<GameSnapshot>,
    gate: SnapshotGate,
    start_open: bool,
    inline_error: Option<String>,
    abort_pending: bool,
    width_ref: NodeRef,
    height_ref: NodeRef,
    mines_ref: NodeRef,
}

impl GameView {
    fn issue(&mut self, ctx: &Context<Self>, op: Op) {
        let seq = self.gate.issue();
        let client = self.client.clone();
        ctx.link().send_future(async move {
            let result = match op {
                Op::Load => client.fetch_state().await,
                Op::Start(body) => client.start(body).await,
                Op::Reveal(body) => client.reveal(body).await,
                Op::Flag(body) => client.toggle_flag(body).await,
                Op::Abandon => client.abandon().await,
            };
            Msg::Done(op, seq, result.map(Box::new))
        });
    }

    fn settle(
        &mut self,
        ctx: &Context<Self>,
        op: Op,
        seq: u64,
        result: Result<Box<GameSnapshot>, ApiError>,
    ) -> bool {
        if matches!(op, Op::Abandon) {
            self.abort_pending = false;
        }
        match result {
            Ok(snapshot) => {
                if !self.gate.admit(seq) {
                    log::debug!("dropping stale response (seq {})", seq);
                    return matches!(op, Op::Abandon);
                }
                debug_assert!(snapshot.dims_consistent());
                self.snapshot = Some(*snapshot);
                self.start_open = false;
                self.inline_error = None;
                true
            }
            Err(err) => self.settle_failure(ctx, op, err),
        }
    }

    fn settle_failure(&mut self, ctx: &Context<Self>, op: Op, err: ApiError) -> bool {
        match op {
            // nothing to resume: configure a new game instead
            Op::Load if err.is_not_found() => {
                self.start_open = true;
                true
            }
            // a game already exists: adopt it instead of failing
            Op::Start(_) if err.is_conflict() => {
                log::debug!("start conflict, fetching the existing game");
                self.issue(ctx, Op::Load);
                false
            }
            // best effort: the server stays authoritative and the next
            // successful move reconciles the view
            Op::Reveal(_) | Op::Flag(_) => {
                log::error!("move failed: {}", err);
                false
            }
            Op::Load | Op::Start(_) | Op::Abandon => {
                log::error!("request failed: {}", err);
                self.inline_error = Some(err.message());
                if matches!(op, Op::Load) {
                    self.start_open = true;
                }
                true
            }
        }
    }

    fn read_start_form(&self) -> StartRequest {
        StartRequest {
            board_width: read_field(&self.width_ref, 10),
            board_height: read_field(&self.height_ref, 10),
            num_mines: read_field(&self.mines_ref, 10),
        }
    }

    fn presentation(&self) -> Option<Presentation> {
        self.snapshot
            .as_ref()
            .map(|snapshot| Presentation::for_status(snapshot.status))
    }

    fn view_header(&self, ctx: &Context<Self>) -> Html {
        let mines_left = format_for_counter(
            self.snapshot.as_ref().map_or(0, GameSnapshot::mines_left),
        );
        let moves = format_for_counter(
            self.snapshot
                .as_ref()
                .map_or(0, |snapshot| snapshot.moves_count as i32),
        );
        let abort_enabled =
            self.presentation().is_some_and(|p| p.abort_enabled) && !self.abort_pending;
        let cb_abandon = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::Abandon
        });

        html! {
            <nav>
                <aside class="mines-left">{mines_left}</aside>
                <span>
                    <button class="abort" disabled={!abort_enabled} onclick={cb_abandon}>
                        {"Abort"}
                    </button>
                </span>
                <aside class="moves-count">{moves}</aside>
            </nav>
        }
    }

    fn view_banner(&self, ctx: &Context<Self>) -> Html {
        let Some(presentation) = self.presentation() else {
            return Html::default();
        };
        let Some(banner) = presentation.banner else {
            return Html::default();
        };
        let cb_continue = ctx.link().callback(|_| Msg::ContinueAfterResult);

        html! {
            <aside class={classes!("banner", banner.kind.class())}>
                <strong>{banner.text}</strong>
                if presentation.show_continue {
                    <button onclick={cb_continue}>{"Continue"}</button>
                }
            </aside>
        }
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let Some(snapshot) = &self.snapshot else {
            return Html::default();
        };
        let board = board::project(snapshot);
        let assets_base = ctx.props().assets_base.clone();
        let callback = ctx.link().callback(Msg::Cell);

        html! {
            <table class="grid">
                {
                    for (0..board.cells.nrows()).map(|row| html! {
                        <tr>
                            {
                                for (0..board.cells.ncols()).map(|col| {
                                    html! {
                                        <CellView
                                            row={row as Coord}
                                            col={col as Coord}
                                            symbol={board.cells[(row, col)]}
                                            interactive={board.interactive}
                                            assets_base={assets_base.clone()}
                                            callback={callback.clone()}/>
                                    }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }

    fn view_start_dialog(&self, ctx: &Context<Self>, open: bool) -> Html {
        let cb_start = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::StartNew
        });

        html! {
            <dialog id="start" {open}>
                <article>
                    <h2>{"New game"}</h2>
                    <label>
                        {"Width"}
                        <input ref={self.width_ref.clone()} type="number" min="2" value="10"/>
                    </label>
                    <label>
                        {"Height"}
                        <input ref={self.height_ref.clone()} type="number" min="2" value="10"/>
                    </label>
                    <label>
                        {"Mines"}
                        <input ref={self.mines_ref.clone()} type="number" min="1" value="10"/>
                    </label>
                    if let Some(message) = &self.inline_error {
                        <p class="error">{message.clone()}</p>
                    }
                    <footer>
                        <button onclick={cb_start}>{"Start"}</button>
                    </footer>
                </article>
            </dialog>
        }
    }
}

fn read_field<T: std::str::FromStr + Copy>(node: &NodeRef, fallback: T) -> T {
    node.cast::<HtmlInputElement>()
        .map(|input| input.value())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(fallback)
}

impl Component for GameView {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let client = GameClient::new(
            ctx.props().api_base.to_string(),
            Identity::get_or_create(),
        );
        let mut view = Self {
            client,
            snapshot: None,
            gate: SnapshotGate::default(),
            start_open: false,
            inline_error: None,
            abort_pending: false,
            width_ref: NodeRef::default(),
            height_ref: NodeRef::default(),
            mines_ref: NodeRef::default(),
        };
        view.issue(ctx, Op::Load);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Cell(CellMsg { row, col, action }) => {
                // handlers only exist while the game is live; anything racing
                // past that is the server's to reject
                let body = MoveRequest { row, col };
                match action {
                    CellAction::Reveal => self.issue(ctx, Op::Reveal(body)),
                    CellAction::ToggleFlag => self.issue(ctx, Op::Flag(body)),
                }
                false
            }
            Msg::StartNew => {
                let request = self.read_start_form();
                if let Err(message) =
                    validate_start(request.board_width, request.board_height)
                {
                    self.inline_error = Some(message);
                    return true;
                }
                self.inline_error = None;
                self.issue(ctx, Op::Start(request));
                true
            }
            Msg::Abandon => {
                if self.abort_pending {
                    return false;
                }
                self.abort_pending = true;
                self.issue(ctx, Op::Abandon);
                true
            }
            Msg::ContinueAfterResult => {
                self.start_open = true;
                true
            }
            Msg::Done(op, seq, result) => self.settle(ctx, op, seq, result),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let show_overlay =
            self.start_open || self.presentation().is_some_and(|p| p.overlay);

        html! {
            <div
                class="sapper"
                oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}
            >
                { self.view_header(ctx) }
                { self.view_banner(ctx) }
                { self.view_board(ctx) }
                { self.view_start_dialog(ctx, show_overlay) }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_board_is_rejected_before_any_request() {
        assert!(validate_start(41, 10).is_err());
        assert!(validate_start(10, 41).is_err());
        let message = validate_start(41, 10).unwrap_err();
        assert!(message.contains("40"));
    }

    #[test]
    fn bound_is_inclusive() {
        assert!(validate_start(40, 40).is_ok());
        assert!(validate_start(10, 10).is_ok());
    }

    #[test]
    fn gate_admits_responses_in_issue_order() {
        let mut gate = SnapshotGate::default();
        let first = gate.issue();
        let second = gate.issue();

        assert!(gate.admit(first));
        assert!(gate.admit(second));
    }

    #[test]
    fn gate_drops_a_stale_response() {
        let mut gate = SnapshotGate::default();
        let slow = gate.issue();
        let fast = gate.issue();

        assert!(gate.admit(fast));
        assert!(!gate.admit(slow));
    }

    #[test]
    fn gate_admits_a_reissued_sequence_after_a_drop() {
        let mut gate = SnapshotGate::default();
        let slow = gate.issue();
        let fast = gate.issue();
        assert!(gate.admit(fast));
        assert!(!gate.admit(slow));

        let next = gate.issue();
        assert!(gate.admit(next));
    }
}
