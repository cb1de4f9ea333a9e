//! Line-oriented operator console
//!
//! Stands in for the touch UI: it renders prompts and notices, turns input
//! lines into [`Event`]s and runs the resulting [`Effect`]s. All model
//! changes happen on the task running [`Console::run`]; dispatch outcomes are
//! forwarded into that task over a channel.

use crate::{
    app::App,
    device_client::{CommandOutcome, DeviceClient},
    dispatcher::DeviceCommandDispatcher,
    events::{Effect, Event},
    menu::MenuAction,
    model::{Model, NoticeLevel},
};
use anyhow::{Context, Result};
use log::{debug, info};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Prompt {
    LoginEmail,
    LoginCode { email: String },
    Menu,
    NewUserEmail,
    NewUserPassword { email: String },
}

impl Prompt {
    fn text(&self) -> &'static str {
        match self {
            Prompt::LoginEmail => "Email: ",
            Prompt::LoginCode { .. } => "Security code: ",
            Prompt::Menu => "Select option: ",
            Prompt::NewUserEmail => "New user email: ",
            Prompt::NewUserPassword { .. } => "New user password: ",
        }
    }
}

pub struct Console<C> {
    app: App,
    dispatcher: DeviceCommandDispatcher<C>,
}

impl<C> Console<C>
where
    C: DeviceClient + Send + Sync + 'static,
{
    pub fn new(app: App, dispatcher: DeviceCommandDispatcher<C>) -> Self {
        Self { app, dispatcher }
    }

    /// Run the console until `input` reaches end of file
    ///
    /// Outcomes of commands still in flight at that point are awaited and
    /// reported before returning.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<CommandOutcome>();
        let mut model = Model::default();
        let mut prompt = Prompt::LoginEmail;
        let mut lines = input.lines();

        write(&mut output, prompt.text()).await?;

        loop {
            tokio::select! {
                Some(outcome) = outcome_rx.recv() => {
                    let effect = self.app.update(Event::DispatchCompleted(outcome), &mut model);
                    write(&mut output, "\n").await?;
                    self.run_effect(effect, &mut model, &mut prompt, &outcome_tx, &mut output)
                        .await?;
                    write(&mut output, prompt.text()).await?;
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read operator input")? else {
                        debug!("operator input closed");
                        break;
                    };

                    self.handle_line(line, &mut model, &mut prompt, &outcome_tx, &mut output)
                        .await?;
                    write(&mut output, prompt.text()).await?;
                }
            }
        }

        while model.pending_dispatches > 0 {
            let Some(outcome) = outcome_rx.recv().await else {
                break;
            };
            let effect = self.app.update(Event::DispatchCompleted(outcome), &mut model);
            write(&mut output, "\n").await?;
            self.run_effect(effect, &mut model, &mut prompt, &outcome_tx, &mut output)
                .await?;
        }

        write(&mut output, "\n").await?;
        info!("console closed");
        Ok(())
    }

    async fn handle_line<W>(
        &self,
        line: String,
        model: &mut Model,
        prompt: &mut Prompt,
        outcome_tx: &mpsc::UnboundedSender<CommandOutcome>,
        output: &mut W,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let event = match std::mem::replace(prompt, Prompt::LoginEmail) {
            Prompt::LoginEmail => {
                *prompt = Prompt::LoginCode { email: line };
                return Ok(());
            }
            Prompt::LoginCode { email } => Event::Login { email, code: line },
            Prompt::Menu => match MenuAction::parse(&line) {
                Some(action) => Event::SelectAction(action),
                None => {
                    *prompt = Prompt::Menu;
                    return write(output, &format!("Unknown option: {}\n", line.trim())).await;
                }
            },
            Prompt::NewUserEmail => {
                *prompt = Prompt::NewUserPassword { email: line };
                return Ok(());
            }
            Prompt::NewUserPassword { email } => Event::AddUser {
                email,
                password: line,
            },
        };

        let effect = self.app.update(event, model);
        *prompt = if model.is_authenticated {
            Prompt::Menu
        } else {
            Prompt::LoginEmail
        };

        self.run_effect(effect, model, prompt, outcome_tx, output).await
    }

    async fn run_effect<W>(
        &self,
        effect: Effect,
        model: &mut Model,
        prompt: &mut Prompt,
        outcome_tx: &mpsc::UnboundedSender<CommandOutcome>,
        output: &mut W,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match effect {
            Effect::Render => render(model, prompt, output).await,
            Effect::PromptAddUser => {
                *prompt = Prompt::NewUserEmail;
                Ok(())
            }
            Effect::Dispatch(request) => {
                let pending = self.dispatcher.dispatch(request);
                let outcome_tx = outcome_tx.clone();

                tokio::spawn(async move {
                    if outcome_tx.send(pending.await).is_err() {
                        debug!("console closed before outcome arrived");
                    }
                });

                write(output, "Sending user to ESP...\n").await
            }
        }
    }
}

async fn render<W>(model: &mut Model, prompt: &Prompt, output: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if let Some(notice) = model.take_notice() {
        let marker = match notice.level {
            NoticeLevel::Success => "[ok]",
            NoticeLevel::Error => "[!!]",
        };
        write(output, &format!("{marker} {}\n", notice.text)).await?;
    }

    if *prompt == Prompt::Menu {
        let mut menu = String::new();
        for (index, action) in MenuAction::ALL.iter().enumerate() {
            menu.push_str(&format!("  {}. {action}\n", index + 1));
        }
        write(output, &menu).await?;
    }

    Ok(())
}

async fn write<W>(output: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output
        .write_all(text.as_bytes())
        .await
        .context("failed to write console output")?;
    output.flush().await.context("failed to flush console output")
}
