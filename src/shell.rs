//! Interactive terminal session: edit the form, submit, read the panels.

use crate::client::{PredictError, PredictionClient};
use crate::form::{Field, PropertyForm, SubmitOutcome};
use crate::models::PredictionResult;
use crate::render;
use crate::session::{Dispatch, Session};
use anyhow::{Context, Result};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  set <field> <value>   edit a field (e.g. set bedrooms 3)
  toggle <field>        flip a yes/no feature (e.g. toggle basement)
  furnish <status>      vazio | semi-mobiliado | mobiliado
  show                  print the form and the current result
  submit                validate and request an estimate
  retry                 resend the last submission after an error
  dismiss               close the result or error panel
  health                check whether the service is ready
  reset                 restore the default form
  help                  this text
  quit                  leave";

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Field, String),
    Toggle(Field),
    Furnish(String),
    Show,
    Submit,
    Retry,
    Dismiss,
    Health,
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| "empty command".to_string())?;
        let rest: Vec<&str> = parts.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("set", [field, value @ ..]) if !value.is_empty() => {
                Command::Set(field.parse()?, value.join(" "))
            }
            ("set", _) => return Err("usage: set <field> <value>".to_string()),
            ("toggle", [field]) => {
                let field: Field = field.parse()?;
                if !field.is_toggle() {
                    return Err(format!("{} is not a yes/no feature", field.label()));
                }
                Command::Toggle(field)
            }
            ("toggle", _) => return Err("usage: toggle <field>".to_string()),
            ("furnish", [status]) => Command::Furnish(status.to_string()),
            ("furnish", _) => return Err("usage: furnish <status>".to_string()),
            ("show", []) => Command::Show,
            ("submit", []) => Command::Submit,
            ("retry", []) => Command::Retry,
            ("dismiss", []) | ("close", []) => Command::Dismiss,
            ("health", []) => Command::Health,
            ("reset", []) => Command::Reset,
            ("help", []) | ("?", []) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            (other, _) => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

/// A finished exchange coming back from a background task
#[derive(Debug)]
pub struct Completion {
    pub id: u64,
    pub result: Result<PredictionResult, PredictError>,
}

/// Form, session and client wired together
pub struct Shell {
    form: PropertyForm,
    session: Session,
    client: Arc<dyn PredictionClient>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: Option<mpsc::UnboundedReceiver<Completion>>,
}

/// What handling a command produced
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

impl Shell {
    pub fn new(client: Arc<dyn PredictionClient>) -> Self {
        Self::with_form(client, PropertyForm::new())
    }

    pub fn with_form(client: Arc<dyn PredictionClient>, form: PropertyForm) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            form,
            session: Session::new(),
            client,
            completions_tx,
            completions_rx: Some(completions_rx),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Hand out the completion stream; the run loop owns it
    pub fn take_completions(&mut self) -> Option<mpsc::UnboundedReceiver<Completion>> {
        self.completions_rx.take()
    }

    pub async fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::Set(field, value) => self.set_field(field, &value),
            Command::Toggle(field) => match self.form.toggle(field) {
                Some(flag) => Reply::text(format!(
                    "{} = {}",
                    field.label(),
                    if flag.is_set() { "yes" } else { "no" }
                )),
                None => Reply::text(format!("{} is not a yes/no feature", field.label())),
            },
            Command::Furnish(status) => self.set_field(Field::FurnishingStatus, &status),
            Command::Show => Reply::text(self.screen()),
            Command::Submit => self.submit(),
            Command::Retry => match self.session.retry() {
                Some(dispatch) => {
                    self.dispatch(dispatch);
                    Reply::text(render::render_outcome(&self.session))
                }
                None => Reply::text("Nothing to retry."),
            },
            Command::Dismiss => {
                if self.session.dismiss() {
                    Reply::text("Closed.")
                } else {
                    Reply::text("Nothing to dismiss.")
                }
            }
            Command::Health => match self.client.health().await {
                Ok(status) if status.is_healthy() => Reply::text(format!(
                    "Service at {} is ready (version {})",
                    self.client.endpoint(),
                    status.version.as_deref().unwrap_or("unknown")
                )),
                Ok(status) => Reply::text(format!("Service reports status '{}'", status.status)),
                Err(err) => Reply::text(format!("Health check failed: {}", err)),
            },
            Command::Reset => {
                self.form.reset();
                Reply::text(render::render_form(&self.form, self.session.is_loading()))
            }
            Command::Help => Reply::text(HELP),
            Command::Quit => Reply {
                text: String::new(),
                quit: true,
            },
        }
    }

    fn set_field(&mut self, field: Field, value: &str) -> Reply {
        match self.form.set(field, value) {
            Ok(()) => Reply::text(format!("{} = {}", field.label(), value)),
            Err(message) => Reply::text(message),
        }
    }

    fn submit(&mut self) -> Reply {
        match self.form.submit(self.session.is_loading()) {
            SubmitOutcome::Blocked => Reply::text("A calculation is already running, please wait."),
            SubmitOutcome::Invalid(_) => {
                Reply::text(render::render_form(&self.form, self.session.is_loading()))
            }
            SubmitOutcome::Ready(attributes) => match self.session.begin(attributes) {
                Some(dispatch) => {
                    self.dispatch(dispatch);
                    Reply::text(render::render_outcome(&self.session))
                }
                None => Reply::text("A calculation is already running, please wait."),
            },
        }
    }

    /// Run the exchange in the background so the prompt stays usable
    fn dispatch(&self, dispatch: Dispatch) {
        let client = Arc::clone(&self.client);
        let tx = self.completions_tx.clone();
        debug!("Dispatching request {}", dispatch.id);
        tokio::spawn(async move {
            let result = client.predict(&dispatch.attributes).await;
            if tx.send(Completion { id: dispatch.id, result }).is_err() {
                debug!("Shell closed before request {} finished", dispatch.id);
            }
        });
    }

    /// Fold a finished exchange into the session and render what changed
    pub fn apply(&mut self, completion: Completion) -> Option<String> {
        if self.session.complete(completion.id, completion.result) {
            Some(render::render_outcome(&self.session))
        } else {
            None
        }
    }

    fn screen(&self) -> String {
        let mut text = render::render_form(&self.form, self.session.is_loading());
        let outcome = render::render_outcome(&self.session);
        if !outcome.is_empty() {
            text.push('\n');
            text.push_str(&outcome);
        }
        text
    }

    /// Read commands from stdin until quit or end of input
    pub async fn run(mut self) -> Result<()> {
        let mut completions = self
            .take_completions()
            .context("Shell is already running")?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        info!("Using prediction service at {}", self.client.endpoint());
        println!("🏠 Property price calculator");
        println!("{}", self.screen());
        println!("Type 'help' for commands.");

        loop {
            prompt()?;
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read from stdin")? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(command) => {
                            let reply = self.handle(command).await;
                            if !reply.text.is_empty() {
                                println!("{}", reply.text);
                            }
                            if reply.quit {
                                break;
                            }
                        }
                        Err(message) => println!("{}", message),
                    }
                }
                Some(completion) = completions.recv() => {
                    match self.apply(completion) {
                        Some(text) => println!("\n{}", text),
                        None => warn!("Ignored a response that is no longer current"),
                    }
                }
            }
        }

        info!("Bye");
        Ok(())
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}
