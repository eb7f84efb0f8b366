//! Tokio runtime for a jog controller
//!
//! The controller lives on its own task. Input events arrive over an mpsc
//! channel; between events the task sleeps until the controller's next
//! timer deadline. Everything the controller does therefore happens on
//! one task, one step at a time.

use crate::controller::{PressOutcome, TouchJogController};
use crate::machine::MachineInterface;
use jogkit_core::{Axis, Direction, Error, JogError, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

const COMMAND_BUFFER: usize = 64;

enum Command {
    PressStart {
        axis: Axis,
        direction: Direction,
    },
    PressEnd {
        reply: oneshot::Sender<PressOutcome>,
    },
    SelectStepSize {
        value: f64,
        reply: oneshot::Sender<std::result::Result<(), JogError>>,
    },
    Home {
        axes: Vec<Axis>,
    },
    HomeAll,
}

/// Handle to a controller running on a tokio task
pub struct JogRuntime<M> {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<TouchJogController<M>>,
}

impl<M> JogRuntime<M>
where
    M: MachineInterface + Send + 'static,
{
    /// Spawn `controller` onto the current tokio runtime
    pub fn spawn(controller: TouchJogController<M>) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(run(controller, rx));
        tracing::info!("Jog runtime started");
        Self { commands, task }
    }

    /// Begin a press
    pub async fn press_start(&self, axis: Axis, direction: Direction) -> Result<()> {
        self.send(Command::PressStart { axis, direction }).await
    }

    /// End the active press and report what it did
    pub async fn press_end(&self) -> Result<PressOutcome> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::PressEnd { reply }).await?;
        rx.await.map_err(|_| JogError::RuntimeStopped.into())
    }

    /// Change the active step size
    pub async fn select_step_size(&self, value: f64) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SelectStepSize { value, reply }).await?;
        rx.await.map_err(|_| JogError::RuntimeStopped)??;
        Ok(())
    }

    /// Request homing of `axes`
    pub async fn home(&self, axes: Vec<Axis>) -> Result<()> {
        self.send(Command::Home { axes }).await
    }

    /// Home the configured home-all axes
    pub async fn home_all(&self) -> Result<()> {
        self.send(Command::HomeAll).await
    }

    /// Stop the task, dispose the controller and hand it back
    pub async fn shutdown(self) -> Result<TouchJogController<M>> {
        let Self { commands, task } = self;
        drop(commands);
        task.await
            .map_err(|e| Error::other(format!("Jog runtime task failed: {}", e)))
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| JogError::RuntimeStopped.into())
    }
}

async fn run<M: MachineInterface>(
    mut controller: TouchJogController<M>,
    mut commands: mpsc::Receiver<Command>,
) -> TouchJogController<M> {
    loop {
        let deadline = controller.next_deadline().map(Instant::from_std);
        let wake = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now));

        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle(&mut controller, command),
                None => break,
            },
            _ = wake, if deadline.is_some() => {
                controller.advance(Instant::now().into_std());
            }
        }
    }

    controller.dispose();
    tracing::info!("Jog runtime stopped");
    controller
}

fn handle<M: MachineInterface>(controller: &mut TouchJogController<M>, command: Command) {
    let now = Instant::now().into_std();
    match command {
        Command::PressStart { axis, direction } => controller.press_start(axis, direction, now),
        Command::PressEnd { reply } => {
            let outcome = controller.press_end(now);
            if reply.send(outcome).is_err() {
                tracing::warn!("Press outcome dropped: caller went away");
            }
        }
        Command::SelectStepSize { value, reply } => {
            reply.send(controller.select_step_size(value)).ok();
        }
        Command::Home { axes } => controller.home(&axes),
        Command::HomeAll => controller.home_all(),
    }
}
