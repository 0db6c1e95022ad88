//! Async driver for `SessionEngine`.
//!
//! The runtime owns the engine and is the only place it is mutated. User
//! actions and async results arrive on one unbounded channel and are
//! processed strictly in arrival order; after each message the new
//! `SessionSnapshot` is published on a `watch` channel.
//!
//! Loads, submissions and leaderboard fetches run as detached tasks that
//! report back through the same channel. The countdown is a `Countdown`
//! that is replaced on every `StartTimer` and dropped on `StopTimer`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::engine::SessionEngine;
use super::event::{Command, SessionEvent, UserAction};
use super::state::SessionSnapshot;
use super::timer::Countdown;
use crate::cards::ChallengeId;
use crate::core::GameError;
use crate::leaderboard::{normalize_nickname, LeaderboardClient};
use crate::loader::ChallengeLoader;

enum Message {
    Action(UserAction, oneshot::Sender<Result<(), GameError>>),
    Event(SessionEvent),
    Shutdown,
}

/// The actor that owns a `SessionEngine`.
pub struct SessionRuntime {
    engine: SessionEngine,
    loader: Arc<dyn ChallengeLoader>,
    leaderboard: Arc<dyn LeaderboardClient>,
    rx: mpsc::UnboundedReceiver<Message>,
    // Weak so the loop ends once every handle is gone.
    tx: mpsc::WeakUnboundedSender<Message>,
    snapshots: watch::Sender<SessionSnapshot>,
    countdown: Option<Countdown>,
    tick_interval: Duration,
}

impl SessionRuntime {
    /// Spawn the runtime on the current tokio runtime.
    pub fn spawn(
        engine: SessionEngine,
        loader: Arc<dyn ChallengeLoader>,
        leaderboard: Arc<dyn LeaderboardClient>,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(engine.snapshot());
        let tick_interval = engine.config().tick_interval;

        let runtime = Self {
            engine,
            loader,
            leaderboard,
            rx,
            tx: tx.downgrade(),
            snapshots,
            countdown: None,
            tick_interval,
        };
        let join = tokio::spawn(runtime.run());

        SessionHandle {
            tx,
            snapshots: snapshot_rx,
            join: Arc::new(Mutex::new(Some(join))),
        }
    }

    async fn run(mut self) {
        info!("session runtime started");
        while let Some(message) = self.rx.recv().await {
            let reply = match message {
                Message::Action(action, reply) => {
                    debug!("action: {:?}", action);
                    let result = match self.engine.apply(action) {
                        Ok(cmds) => {
                            for cmd in cmds {
                                self.execute(cmd);
                            }
                            Ok(())
                        }
                        Err(e) => {
                            debug!("action rejected: {}", e);
                            Err(e)
                        }
                    };
                    Some((reply, result))
                }
                Message::Event(event) => {
                    for cmd in self.engine.handle(event) {
                        self.execute(cmd);
                    }
                    None
                }
                Message::Shutdown => break,
            };
            // Snapshot goes out before the reply.
            self.snapshots.send_replace(self.engine.snapshot());
            if let Some((reply, result)) = reply {
                let _ = reply.send(result);
            }
        }
        self.countdown = None;
        info!("session runtime stopped");
    }

    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::Load { generation, descriptor } => {
                let Some(tx) = self.tx.upgrade() else { return };
                let loader = Arc::clone(&self.loader);
                tokio::spawn(async move {
                    let id: ChallengeId = descriptor.id;
                    let result = loader.resolve(descriptor).await;
                    let _ = tx.send(Message::Event(SessionEvent::AssetLoaded {
                        generation,
                        id,
                        result,
                    }));
                });
            }
            Command::StartTimer { generation, epoch } => {
                let weak = self.tx.clone();
                self.countdown = Some(Countdown::spawn(self.tick_interval, move || {
                    weak.upgrade().is_some_and(|tx| {
                        tx.send(Message::Event(SessionEvent::Tick { generation, epoch }))
                            .is_ok()
                    })
                }));
            }
            Command::StopTimer => {
                self.countdown = None;
            }
            Command::Submit {
                generation,
                nickname,
                score,
            } => {
                let Some(tx) = self.tx.upgrade() else { return };
                let client = Arc::clone(&self.leaderboard);
                tokio::spawn(async move {
                    let result = client.submit(&nickname, score).await;
                    let _ = tx.send(Message::Event(SessionEvent::SubmissionCompleted {
                        generation,
                        result,
                    }));
                });
            }
            Command::FetchLeaderboard { generation } => {
                let Some(tx) = self.tx.upgrade() else { return };
                let client = Arc::clone(&self.leaderboard);
                tokio::spawn(async move {
                    let result = client.fetch().await;
                    let _ = tx.send(Message::Event(SessionEvent::LeaderboardLoaded {
                        generation,
                        result,
                    }));
                });
            }
        }
    }
}

/// Cloneable front end to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Message>,
    snapshots: watch::Receiver<SessionSnapshot>,
    join: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionHandle {
    async fn send(&self, action: UserAction) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Message::Action(action, reply))
            .map_err(|_| GameError::SessionClosed)?;
        rx.await.map_err(|_| GameError::SessionClosed)?
    }

    pub async fn start_game(&self) -> Result<(), GameError> {
        self.send(UserAction::StartGame).await
    }

    /// Drop the current card on a zone.
    pub async fn drop_on_zone(&self, is_positive_zone: bool) -> Result<(), GameError> {
        self.send(UserAction::DropOnZone { is_positive_zone }).await
    }

    /// Drop a specific card; ignored unless it is the current one.
    pub async fn drop_challenge(
        &self,
        id: ChallengeId,
        is_positive_zone: bool,
    ) -> Result<(), GameError> {
        self.send(UserAction::DropChallenge { id, is_positive_zone }).await
    }

    /// Submit the final score. Blank nicknames are rejected locally.
    pub async fn submit_score(&self, nickname: &str) -> Result<(), GameError> {
        let Some(nickname) = normalize_nickname(nickname) else {
            warn!("refusing to submit with an empty nickname");
            return Err(GameError::InvalidInput(
                "nickname must not be empty".to_string(),
            ));
        };
        self.send(UserAction::SubmitScore { nickname }).await
    }

    pub async fn show_leaderboard(&self) -> Result<(), GameError> {
        self.send(UserAction::ShowLeaderboard).await
    }

    pub async fn return_to_menu(&self) -> Result<(), GameError> {
        self.send(UserAction::ReturnToMenu).await
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `pred`.
    pub async fn wait_for<F>(&self, mut pred: F) -> Result<SessionSnapshot, GameError>
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| pred(s))
            .await
            .map_err(|_| GameError::SessionClosed)?;
        Ok(snapshot.clone())
    }

    /// Stop the runtime and wait for it to exit.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Message::Shutdown);
        let join = self.join.lock().take();
        if let Some(join) = join {
            if let Err(e) = join.await {
                warn!("session runtime panicked: {}", e);
            }
        }
    }
}
