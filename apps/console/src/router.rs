use std::io::Write;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use appointment_cell::AppointmentManager;
use doctor_cell::DoctorSchema;
use notification_cell::{NotificationChannel, NotificationEvent};
use patient_cell::PatientSchema;
use resource_cell::{Confirm, Outcome};
use shared_api_client::ApiClient;
use shared_models::EntityId;

use crate::prompt::InputLines;
use crate::views::AdminView;

const HELP: &str = "\
Pages:    patients | doctors | appointments | home
List:     list | search [term]
Form:     new | edit <id> | set <field> <value> | form | save | cancel
Other:    delete <id> | options | toasts | dismiss <n> | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Patients,
    Doctors,
    Appointments,
}

impl Page {
    fn prompt(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Patients => "patients",
            Page::Doctors => "doctors",
            Page::Appointments => "appointments",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(Page),
    List,
    Search(String),
    New,
    Edit(EntityId),
    Set { field: String, value: String },
    Form,
    Save,
    Cancel,
    Delete(EntityId),
    Options,
    Toasts,
    Dismiss(usize),
    Help,
    Quit,
    Nothing,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let id = |what: &str| -> Result<EntityId, String> {
        if rest.is_empty() {
            return Err(format!("usage: {} <id>", what));
        }
        rest.parse::<EntityId>().map_err(|e| e.to_string())
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => Command::Nothing,
        "home" => Command::Open(Page::Home),
        "patients" => Command::Open(Page::Patients),
        "doctors" => Command::Open(Page::Doctors),
        "appointments" => Command::Open(Page::Appointments),
        "list" | "ls" => Command::List,
        "search" => Command::Search(rest.to_string()),
        "new" | "add" => Command::New,
        "edit" => Command::Edit(id("edit")?),
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if field.is_empty() {
                return Err("usage: set <field> <value>".to_string());
            }
            Command::Set { field: field.to_string(), value: value.trim().to_string() }
        }
        "form" => Command::Form,
        "save" | "submit" => Command::Save,
        "cancel" => Command::Cancel,
        "delete" | "rm" => Command::Delete(id("delete")?),
        "options" => Command::Options,
        "toasts" => Command::Toasts,
        "dismiss" => Command::Dismiss(
            rest.parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| "usage: dismiss <n> (see `toasts`)".to_string())?,
        ),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type `help`.", other)),
    };
    Ok(command)
}

/// Prints each notification as it is added to the display list.
pub fn spawn_toast_printer(notifier: &NotificationChannel) {
    let mut events = notifier.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(NotificationEvent::Added(notification)) => {
                    println!("[{}] {}", notification.kind, notification.message);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Toast printer skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

pub struct ConsoleRouter {
    notifier: NotificationChannel,
    patients: Arc<dyn AdminView>,
    doctors: Arc<dyn AdminView>,
    appointments: Arc<dyn AdminView>,
}

impl ConsoleRouter {
    pub fn new(api: &ApiClient, notifier: NotificationChannel, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            patients: Arc::new(PatientSchema::manager(api, notifier.clone(), confirm.clone())),
            doctors: Arc::new(DoctorSchema::manager(api, notifier.clone(), confirm.clone())),
            appointments: Arc::new(AppointmentManager::new(api, notifier.clone(), confirm)),
            notifier,
        }
    }

    fn view(&self, page: Page) -> Option<&Arc<dyn AdminView>> {
        match page {
            Page::Home => None,
            Page::Patients => Some(&self.patients),
            Page::Doctors => Some(&self.doctors),
            Page::Appointments => Some(&self.appointments),
        }
    }

    pub async fn run(&self, input: InputLines) -> anyhow::Result<()> {
        println!("Welcome to HospitalConnect\n{}", HELP);
        let mut page = Page::Home;

        loop {
            print!("{}> ", page.prompt());
            std::io::stdout().flush()?;

            let line = input.lock().await.next_line().await?;
            let Some(line) = line else { break };

            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => page = self.dispatch(page, command).await,
                Err(message) => println!("{}", message),
            }
        }

        info!("Admin console closed");
        Ok(())
    }

    async fn dispatch(&self, page: Page, command: Command) -> Page {
        match command {
            Command::Open(next) => {
                if let Some(view) = self.view(next) {
                    view.activate().await;
                    println!("{}", view.render().await);
                }
                return next;
            }
            Command::Help => println!("{}", HELP),
            Command::Nothing => {}
            Command::Toasts => self.print_toasts().await,
            Command::Dismiss(n) => self.dismiss(n).await,
            command => match self.view(page) {
                Some(view) => self.dispatch_view(view.as_ref(), command).await,
                None => println!("Open a page first: patients | doctors | appointments"),
            },
        }
        page
    }

    async fn dispatch_view(&self, view: &dyn AdminView, command: Command) {
        match command {
            Command::List => println!("{}", view.render().await),
            Command::Search(term) => {
                view.search(&term).await;
                println!("{}", view.render().await);
            }
            Command::New => {
                view.begin_create().await;
                self.print_form(view).await;
            }
            Command::Edit(id) => {
                if view.begin_edit(&id).await {
                    self.print_form(view).await;
                } else {
                    println!("Nothing with id {} in the current {} list", id, view.title());
                }
            }
            Command::Set { field, value } => {
                if let Err(e) = view.set_field(&field, &value).await {
                    println!("{}", e);
                }
            }
            Command::Form => self.print_form(view).await,
            Command::Save => match view.submit().await {
                Outcome::Completed => println!("{}", view.render().await),
                Outcome::Failed => self.print_form(view).await,
                Outcome::Declined => println!("No form is open. Use `new` or `edit <id>`."),
            },
            Command::Cancel => view.cancel().await,
            Command::Delete(id) => {
                if view.delete(&id).await == Outcome::Completed {
                    println!("{}", view.render().await);
                }
            }
            Command::Options => match view.options().await {
                Some(options) => print!("{}", options),
                None => println!("This page has no selection inputs."),
            },
            _ => {}
        }
    }

    async fn print_form(&self, view: &dyn AdminView) {
        match view.form().await {
            Some(form) => println!("{}", form),
            None => println!("No form is open."),
        }
    }

    async fn print_toasts(&self) {
        let toasts = self.notifier.snapshot().await;
        if toasts.is_empty() {
            println!("No notifications.");
        }
        for (i, toast) in toasts.iter().enumerate() {
            println!("{:>2}. [{}] {} ({:?})", i + 1, toast.kind, toast.message, toast.phase);
        }
    }

    async fn dismiss(&self, n: usize) {
        let toasts = self.notifier.snapshot().await;
        match toasts.get(n - 1) {
            Some(toast) => {
                self.notifier.dismiss(toast.id).await;
            }
            None => println!("No notification #{}", n),
        }
    }
}
