//! Room actor: an isolated Tokio task that owns one match.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Connections, timers, and the bot all feed
//! the same channel, so all mutation of a match is serialized through
//! one receiver — the at-most-one-concurrent-mutation guarantee is
//! structural, not locked.
//!
//! Timers deliver [`TimerEvent`]s back into the channel instead of
//! touching state directly. Cancellation is best-effort (an event may
//! already be in flight when its task is aborted), so every handler
//! re-validates the active flag — and expiries additionally the mole
//! instance id — before acting.

use std::time::Duration;

use molerush_game::{
    GameConfig, MatchState, MoleId, OpponentPolicy, ScriptedBot,
};
use molerush_protocol::{
    ClientMessage, RoomCode, Seat, ServerMessage, Winner,
};
use molerush_timer::{TaskSet, once, repeating};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot};

use crate::RoomError;

/// Channel sender for delivering outbound messages to one seat's
/// connection handler.
pub type SeatSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Attach a second participant to the guest seat.
    Join {
        sender: SeatSender,
        reply: oneshot::Sender<Result<Seat, RoomError>>,
    },

    /// Deliver an in-room message from a seat.
    Message { seat: Seat, msg: ClientMessage },

    /// A seat's connection closed. Terminal for the room.
    Disconnect { seat: Seat },

    /// A scheduled activity fired.
    Timer(TimerEvent),
}

/// Events produced by the room's scheduled tasks.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TimerEvent {
    /// The post-join / post-bot countdown elapsed.
    StartGame,
    /// 1 Hz match countdown tick.
    Second,
    /// Difficulty ramp step.
    Ramp,
    /// Tutorial phase unlock.
    Tutorial(u8),
    /// Time to spawn the next mole.
    SpawnDue,
    /// A mole's lifespan elapsed. Only honored if the slot still holds
    /// this exact instance.
    Expiry { index: usize, id: MoleId },
    /// Bot decision tick.
    BotTick,
}

/// Keys for the room's named scheduled tasks. The whole set is
/// cancelled as a unit on `end_game` and on disconnect teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TaskKey {
    Start,
    Countdown,
    Ramp,
    Tutorial(u8),
    Spawn,
    Expiry(usize),
    Bot,
}

/// Lifecycle of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomPhase {
    /// Created, guest seat empty.
    Lobby,
    /// Guest joined or bot requested; start timer pending.
    Countdown,
    /// Timers and spawns running.
    Active,
    /// Terminal. The match summary has been broadcast.
    Ended,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Requests the guest seat. Returns the assigned seat on success.
    pub async fn join(&self, sender: SeatSender) -> Result<Seat, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Delivers an in-room message from a seat (fire-and-forget).
    pub async fn send_message(
        &self,
        seat: Seat,
        msg: ClientMessage,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Message { seat, msg })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Reports a seat's connection as closed.
    pub async fn disconnect(&self, seat: Seat) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { seat })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    code: RoomCode,
    config: GameConfig,
    host: SeatSender,
    guest: Option<SeatSender>,
    bot: Option<Box<dyn OpponentPolicy>>,
    phase: RoomPhase,
    state: MatchState,
    tasks: TaskSet<TaskKey>,
    rng: StdRng,
    /// Clone handed to timer tasks so their events re-enter the actor.
    self_tx: mpsc::Sender<RoomCommand>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until a seat disconnects.
    async fn run(mut self) {
        tracing::info!(room = %self.code, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { sender, reply } => {
                    let _ = reply.send(self.handle_join(sender));
                }
                RoomCommand::Message { seat, msg } => {
                    self.handle_message(seat, msg);
                }
                RoomCommand::Timer(event) => {
                    self.handle_timer(event);
                }
                RoomCommand::Disconnect { seat } => {
                    self.handle_disconnect(seat);
                    break;
                }
            }
        }

        tracing::info!(room = %self.code, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        sender: SeatSender,
    ) -> Result<Seat, RoomError> {
        if self.phase != RoomPhase::Lobby
            || self.guest.is_some()
            || self.bot.is_some()
        {
            return Err(RoomError::Full(self.code.clone()));
        }

        let _ = sender.send(ServerMessage::RoomJoined {
            code: self.code.clone(),
        });
        self.guest = Some(sender);
        self.send_to(Seat::Host, ServerMessage::OpponentJoined);

        tracing::info!(room = %self.code, "guest joined");

        // Brief countdown before the match; the timer re-checks that
        // the guest is still present when it fires.
        self.phase = RoomPhase::Countdown;
        self.schedule_once(
            TaskKey::Start,
            self.config.join_countdown,
            TimerEvent::StartGame,
        );

        Ok(Seat::Guest)
    }

    fn handle_message(&mut self, seat: Seat, msg: ClientMessage) {
        match msg {
            ClientMessage::Whack { index } => {
                self.apply_whack(seat, index);
            }
            ClientMessage::HandPos { positions } => {
                self.send_to(
                    seat.opponent(),
                    ServerMessage::OpponentHands { positions },
                );
            }
            ClientMessage::Signal { data } => {
                self.send_to(
                    seat.opponent(),
                    ServerMessage::Signal { data },
                );
            }
            ClientMessage::StartBot => self.handle_start_bot(seat),
            ClientMessage::CreateRoom | ClientMessage::JoinRoom { .. } => {
                tracing::debug!(
                    room = %self.code,
                    %seat,
                    "routing-level message inside a room, ignoring"
                );
            }
        }
    }

    fn handle_start_bot(&mut self, seat: Seat) {
        if seat != Seat::Host
            || self.phase != RoomPhase::Lobby
            || self.guest.is_some()
        {
            tracing::debug!(
                room = %self.code,
                %seat,
                "start_bot rejected, ignoring"
            );
            return;
        }

        self.bot = Some(Box::new(ScriptedBot::new()));
        self.send_to(Seat::Host, ServerMessage::BotActivated);
        tracing::info!(room = %self.code, "bot opponent activated");

        self.phase = RoomPhase::Countdown;
        self.schedule_once(
            TaskKey::Start,
            self.config.bot_countdown,
            TimerEvent::StartGame,
        );
    }

    fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::StartGame => {
                // The opponent may have vanished during the countdown.
                if self.phase == RoomPhase::Countdown
                    && (self.guest.is_some() || self.bot.is_some())
                {
                    self.start_game();
                } else {
                    tracing::debug!(room = %self.code, "stale start timer");
                }
            }

            TimerEvent::Second => {
                if !self.state.active {
                    return;
                }
                let time_left = self.state.tick_second();
                self.broadcast(ServerMessage::TimerSync { time_left });
                if time_left == 0 {
                    self.end_game();
                }
            }

            TimerEvent::Ramp => {
                if !self.state.active {
                    return;
                }
                self.state.difficulty.ramp_step();
                tracing::debug!(
                    room = %self.code,
                    difficulty = ?self.state.difficulty,
                    "difficulty ramped"
                );
            }

            TimerEvent::Tutorial(phase) => {
                if self.state.active {
                    self.state.advance_tutorial(phase);
                }
            }

            TimerEvent::SpawnDue => {
                if !self.state.active {
                    return;
                }
                if let Some(spawn) = self.state.spawn_mole(&mut self.rng) {
                    self.broadcast(ServerMessage::SpawnMole {
                        index: spawn.index,
                        mole_type: spawn.kind,
                    });
                    self.schedule_once(
                        TaskKey::Expiry(spawn.index),
                        spawn.lifespan,
                        TimerEvent::Expiry {
                            index: spawn.index,
                            id: spawn.id,
                        },
                    );
                }
                // Reschedule even when the grid was full.
                self.schedule_next_spawn();
            }

            TimerEvent::Expiry { index, id } => {
                if self.state.active && self.state.expire(index, id) {
                    self.broadcast(ServerMessage::HideMole {
                        index,
                        whacker: None,
                    });
                }
            }

            TimerEvent::BotTick => self.bot_tick(),
        }
    }

    /// Applies a hit claim. The single scoring path — the bot comes
    /// through here with `Seat::Guest` exactly like a human would.
    fn apply_whack(&mut self, seat: Seat, index: usize) {
        use molerush_game::WhackOutcome;

        if !self.state.active {
            return;
        }
        match self.state.resolve_whack(seat, index) {
            WhackOutcome::Miss => {}
            WhackOutcome::Hit {
                kind,
                points,
                consumed,
                damaged,
            } => {
                if damaged {
                    self.broadcast(ServerMessage::HelmetDamaged { index });
                }
                self.broadcast(ServerMessage::ScoreUpdate {
                    scores: self.state.scores,
                    whacker: seat,
                    hole_index: index,
                    points,
                    mole_type: kind,
                });
                if consumed {
                    self.tasks.cancel(&TaskKey::Expiry(index));
                    self.broadcast(ServerMessage::HideMole {
                        index,
                        whacker: Some(seat),
                    });
                }
            }
        }
    }

    fn bot_tick(&mut self) {
        if !self.state.active {
            return;
        }
        let decision = match self.bot.as_mut() {
            Some(bot) => bot
                .choose_target(&self.state.holes)
                .map(|index| (index, bot.hand_positions(index))),
            None => return,
        };

        if let Some((index, hands)) = decision {
            self.apply_whack(Seat::Guest, index);
            // Only the host has a screen to show the bot's hands on.
            self.send_to(
                Seat::Host,
                ServerMessage::OpponentHands {
                    positions: hands.to_vec(),
                },
            );
        }
    }

    fn start_game(&mut self) {
        self.state.start(&self.config);
        self.phase = RoomPhase::Active;

        self.send_to(Seat::Host, ServerMessage::GameStart { role: Seat::Host });
        if self.guest.is_some() {
            self.send_to(
                Seat::Guest,
                ServerMessage::GameStart { role: Seat::Guest },
            );
        }

        self.schedule_repeating(
            TaskKey::Countdown,
            Duration::from_secs(1),
            TimerEvent::Second,
        );
        self.schedule_repeating(
            TaskKey::Ramp,
            self.config.ramp_period,
            TimerEvent::Ramp,
        );
        let [phase1, phase2] = self.config.tutorial_thresholds;
        self.schedule_once(TaskKey::Tutorial(1), phase1, TimerEvent::Tutorial(1));
        self.schedule_once(TaskKey::Tutorial(2), phase2, TimerEvent::Tutorial(2));
        self.schedule_next_spawn();

        if self.bot.is_some() {
            // One period for the whole match, drawn from the configured
            // bounds.
            let period = Duration::from_secs_f64(self.rng.random_range(
                self.config.bot_tick_min.as_secs_f64()
                    ..self.config.bot_tick_max.as_secs_f64(),
            ));
            self.schedule_repeating(TaskKey::Bot, period, TimerEvent::BotTick);
        }

        tracing::info!(
            room = %self.code,
            bot = self.bot.is_some(),
            "game started"
        );
    }

    /// Ends the match. Idempotent: a countdown reaching zero and a
    /// disconnect arriving in the same breath produce one summary.
    fn end_game(&mut self) {
        if self.phase == RoomPhase::Ended {
            return;
        }
        self.phase = RoomPhase::Ended;
        self.state.active = false;
        self.tasks.cancel_all();

        let scores = self.state.scores;
        let winner = if scores.host > scores.guest {
            Winner::Host
        } else if scores.guest > scores.host {
            Winner::Guest
        } else {
            Winner::Tie
        };
        self.broadcast(ServerMessage::GameOver {
            scores,
            time_left: self.state.time_left,
            winner,
        });

        tracing::info!(
            room = %self.code,
            host = scores.host,
            guest = scores.guest,
            ?winner,
            "game over"
        );
    }

    fn handle_disconnect(&mut self, seat: Seat) {
        tracing::info!(room = %self.code, %seat, "seat disconnected");
        if self.phase == RoomPhase::Active {
            self.end_game();
        }
        self.tasks.cancel_all();
        self.send_to(seat.opponent(), ServerMessage::OpponentDisconnected);
    }

    fn schedule_next_spawn(&mut self) {
        let delay = self.state.difficulty.spawn_delay(&mut self.rng);
        self.schedule_once(TaskKey::Spawn, delay, TimerEvent::SpawnDue);
    }

    fn schedule_once(
        &mut self,
        key: TaskKey,
        delay: Duration,
        event: TimerEvent,
    ) {
        self.tasks.insert(
            key,
            once(self.self_tx.clone(), delay, RoomCommand::Timer(event)),
        );
    }

    fn schedule_repeating(
        &mut self,
        key: TaskKey,
        period: Duration,
        event: TimerEvent,
    ) {
        self.tasks.insert(
            key,
            repeating(self.self_tx.clone(), period, move || {
                RoomCommand::Timer(event)
            }),
        );
    }

    /// Sends a message to one seat. Silently drops if the receiver is
    /// gone — the disconnect command is already on its way.
    fn send_to(&self, seat: Seat, msg: ServerMessage) {
        let sender = match seat {
            Seat::Host => Some(&self.host),
            Seat::Guest => self.guest.as_ref(),
        };
        if let Some(sender) = sender {
            let _ = sender.send(msg);
        }
    }

    fn broadcast(&self, msg: ServerMessage) {
        let _ = self.host.send(msg.clone());
        if let Some(guest) = &self.guest {
            let _ = guest.send(msg);
        }
    }
}

/// Command channel size per room. Inbound traffic per room is tiny —
/// two players and a handful of timers.
const CHANNEL_SIZE: usize = 64;

/// Spawns a new room actor task with the host seat already bound, and
/// returns a handle to communicate with it.
pub(crate) fn spawn_room(
    code: RoomCode,
    config: GameConfig,
    host: SeatSender,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let state = MatchState::new(&config);
    let actor = RoomActor {
        code: code.clone(),
        config,
        host,
        guest: None,
        bot: None,
        phase: RoomPhase::Lobby,
        state,
        tasks: TaskSet::new(),
        rng: StdRng::from_os_rng(),
        self_tx: tx.clone(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
