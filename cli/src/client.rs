//! Local client commands
//!
//! Runs against the configured database directly. The signed-in user is
//! kept in the `currentUser` record between invocations.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;

use plant_bio::application::Session;
use plant_bio::config::AppConfig;
use plant_bio::domain::{
    actions, DomainError, DomainResult, LogFilter, LogStats, NewLogEntry, NewUser, PlantBio,
    PlantQuery, PlantView, SeasonName, SessionUser, UpdateProfile, UserRole, INDIGENOUS_SEASONS,
};
use plant_bio::infrastructure::{init_database, RecordStore, SeaOrmCollectionStore, UserRepository};
use plant_bio::AppState;

const MIN_PASSWORD_LEN: usize = 6;
const DEFAULT_LOG_LIMIT: usize = 100;

type CliResult = Result<String, Box<dyn std::error::Error>>;

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// Sign in and remember the session.
    Login { email: String, password: String },
    /// Forget the current session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Create an account (admin only).
    Register {
        email: String,
        password: String,
        name: String,
        #[arg(long, default_value = "student")]
        role: UserRole,
    },
    /// Change the signed-in user's name or email.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the signed-in user's password.
    Passwd { current: String, new: String },
    /// Browse and manage plant biographies.
    #[command(subcommand)]
    Plants(PlantsCommand),
    /// Read the activity log.
    #[command(subcommand)]
    Logs(LogsCommand),
    /// Show the indigenous seasons, or one of them.
    Seasons { name: Option<SeasonName> },
}

#[derive(Subcommand, Debug)]
pub enum PlantsCommand {
    /// Gallery listing with optional search and season filter.
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        season: Option<SeasonName>,
    },
    /// Records the signed-in user may manage.
    Mine,
    /// Display page for one record.
    Show { id: String },
    /// Save a record's QR code as PNG.
    Qr {
        id: String,
        /// Output path; defaults to the plant's QR file name.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete a record (author or admin).
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    /// Newest entries first (admin only).
    List {
        #[arg(short, long, default_value_t = LogFilter::All)]
        filter: LogFilter,
        #[arg(short, long, default_value_t = DEFAULT_LOG_LIMIT)]
        limit: usize,
    },
    /// Aggregated counts. Per-user activity is shown to admins only.
    Stats,
}

pub struct Client {
    state: AppState,
    session: Session<UserRepository>,
}

impl Client {
    pub async fn open(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db = init_database(&config.database_config()).await?;
        let store = RecordStore::new(Arc::new(SeaOrmCollectionStore::new(db)));
        Ok(Self::with_store(store, config).await?)
    }

    pub async fn with_store(store: RecordStore, config: &AppConfig) -> DomainResult<Self> {
        let state = AppState::new(
            store.clone(),
            config.jwt_config(),
            config.server.public_base_url.clone(),
        );
        let session = Session::restore(state.identity.clone(), store).await?;
        Ok(Self { state, session })
    }

    fn signed_in(&self) -> DomainResult<SessionUser> {
        self.session
            .current()
            .cloned()
            .ok_or(DomainError::NotAuthenticated)
    }

    fn admin(&self) -> DomainResult<SessionUser> {
        let user = self.signed_in()?;
        if !user.is_admin() {
            return Err(DomainError::Forbidden("admin access required".into()));
        }
        Ok(user)
    }

    async fn log(&self, entry: NewLogEntry) {
        self.state.activity.record_quietly(entry).await;
    }

    pub async fn run(&mut self, command: ClientCommand) -> CliResult {
        match command {
            ClientCommand::Login { email, password } => {
                let user = self.session.login(&email, &password).await?;
                self.log(NewLogEntry::new(actions::USER_LOGIN, "login").by(&user))
                    .await;
                Ok(format!("Logged in as {} <{}> ({})", user.name, user.email, user.role))
            }
            ClientCommand::Logout => {
                if let Some(user) = self.session.current().cloned() {
                    self.log(NewLogEntry::new(actions::USER_LOGOUT, "dashboard").by(&user))
                        .await;
                }
                self.session.logout().await?;
                Ok("Logged out".to_string())
            }
            ClientCommand::Whoami => Ok(match self.session.current() {
                Some(user) => format!("{} <{}> ({}, {})", user.name, user.email, user.role, user.id),
                None => "Not logged in".to_string(),
            }),
            ClientCommand::Register {
                email,
                password,
                name,
                role,
            } => {
                check_password(&password)?;
                let created = self
                    .session
                    .register(NewUser {
                        email,
                        password,
                        name,
                        role,
                    })
                    .await?;
                let admin = self.signed_in()?;
                self.log(NewLogEntry::new(actions::USER_CREATED, "register").by(&admin))
                    .await;
                Ok(format!("Created {} {} ({})", created.role, created.email, created.id))
            }
            ClientCommand::Profile { name, email } => {
                let update = UpdateProfile { name, email };
                if update.is_empty() {
                    return Err(DomainError::Validation("nothing to update".into()).into());
                }
                let user = self
                    .session
                    .update_profile(&update)
                    .await?
                    .ok_or(DomainError::NotAuthenticated)?;
                self.log(NewLogEntry::new(actions::PROFILE_UPDATED, "profile").by(&user))
                    .await;
                Ok(format!("Profile updated: {} <{}>", user.name, user.email))
            }
            ClientCommand::Passwd { current, new } => {
                check_password(&new)?;
                self.session.update_password(&current, &new).await?;
                let user = self.signed_in()?;
                self.log(NewLogEntry::new(actions::PASSWORD_CHANGED, "profile").by(&user))
                    .await;
                Ok("Password changed".to_string())
            }
            ClientCommand::Plants(command) => self.plants(command).await,
            ClientCommand::Logs(command) => self.logs(command).await,
            ClientCommand::Seasons { name } => Ok(seasons(name)),
        }
    }

    async fn plants(&self, command: PlantsCommand) -> CliResult {
        match command {
            PlantsCommand::List { search, season } => {
                let plants = self.state.plants.search(&PlantQuery { search, season }).await?;
                Ok(plant_table(&plants))
            }
            PlantsCommand::Mine => {
                let user = self.signed_in()?;
                let plants = self.state.plants.dashboard(&user).await?;
                Ok(plant_table(&plants))
            }
            PlantsCommand::Show { id } => {
                let view: PlantView = self
                    .state
                    .plants
                    .display(&id, self.session.current(), None)
                    .await?;
                Ok(serde_json::to_string_pretty(&view)?)
            }
            PlantsCommand::Qr { id, out } => {
                let qr = self
                    .state
                    .plants
                    .qr_png(&id, self.session.current())
                    .await?;
                let path = out.unwrap_or_else(|| PathBuf::from(&qr.file_name));
                std::fs::write(&path, &qr.png)?;
                Ok(format!("Saved {}", path.display()))
            }
            PlantsCommand::Delete { id } => {
                let user = self.signed_in()?;
                Ok(if self.state.plants.delete(&user, &id).await? {
                    format!("Deleted {}", id)
                } else {
                    format!("No plant with id {}", id)
                })
            }
        }
    }

    async fn logs(&self, command: LogsCommand) -> CliResult {
        match command {
            LogsCommand::List { filter, limit } => {
                self.admin()?;
                let entries = self.state.activity.list(filter, limit).await?;
                let mut out = String::new();
                for e in &entries {
                    let _ = write!(
                        out,
                        "{}  {:<16} {:<14}",
                        e.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        e.action,
                        e.page
                    );
                    if let Some(name) = &e.user_name {
                        let _ = write!(out, " user={}", name);
                    }
                    if let Some(name) = &e.plant_name {
                        let _ = write!(out, " plant={}", name);
                    }
                    out.push('\n');
                }
                let _ = write!(out, "{} entries", entries.len());
                Ok(out)
            }
            LogsCommand::Stats => {
                let mut stats = self.state.activity.aggregate().await?;
                if !self.session.current().is_some_and(SessionUser::is_admin) {
                    stats.student_activity.clear();
                }
                Ok(stats_report(&stats))
            }
        }
    }
}

fn check_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn plant_table(plants: &[PlantBio]) -> String {
    let mut out = String::new();
    for p in plants {
        let _ = writeln!(
            out,
            "{:<44} {:<24} {:<32} {}",
            p.id, p.details.common_name, p.details.botanical_name, p.details.indigenous_season
        );
    }
    let _ = write!(out, "{} plants", plants.len());
    out
}

fn stats_report(stats: &LogStats) -> String {
    let mut out = format!("Total logs: {}\n", stats.total_logs);

    out.push_str("\nPage views:\n");
    for (page, count) in &stats.page_views {
        let _ = writeln!(out, "  {:<20} {}", page, count);
    }

    out.push_str("\nPlant views:\n");
    for (id, named) in &stats.plant_views {
        let _ = writeln!(out, "  {:<24} {:<6} {}", named.name, named.count, id);
    }

    if !stats.student_activity.is_empty() {
        out.push_str("\nUser activity:\n");
        for (id, named) in &stats.student_activity {
            let _ = writeln!(out, "  {:<24} {:<6} {}", named.name, named.count, id);
        }
    }
    out.trim_end().to_string()
}

fn seasons(name: Option<SeasonName>) -> String {
    let describe = |s: &plant_bio::domain::IndigenousSeason| {
        format!(
            "{} ({})\n  {}\n  Weather: {}\n  Plants:  {}\n  Animals: {}",
            s.name, s.period, s.description, s.weather, s.plant_indicators, s.animal_behavior
        )
    };
    match name {
        Some(season) => describe(season.info()),
        None => INDIGENOUS_SEASONS
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn client() -> Client {
        Client::with_store(RecordStore::in_memory(), &AppConfig::default())
            .await
            .unwrap()
    }

    async fn login_admin(c: &mut Client) {
        c.run(ClientCommand::Login {
            email: "admin@kangan.edu.au".into(),
            password: "admin123".into(),
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn login_then_whoami() {
        let mut c = client().await;
        let out = c.run(ClientCommand::Whoami).await.unwrap();
        assert_eq!(out, "Not logged in");

        login_admin(&mut c).await;
        let out = c.run(ClientCommand::Whoami).await.unwrap();
        assert!(out.starts_with("Admin User <admin@kangan.edu.au> (admin"));

        c.run(ClientCommand::Logout).await.unwrap();
        assert_eq!(c.run(ClientCommand::Whoami).await.unwrap(), "Not logged in");
    }

    #[tokio::test]
    async fn session_survives_a_new_client_on_the_same_store() {
        let store = RecordStore::in_memory();
        let mut first = Client::with_store(store.clone(), &AppConfig::default())
            .await
            .unwrap();
        login_admin(&mut first).await;

        let mut second = Client::with_store(store, &AppConfig::default()).await.unwrap();
        let out = second.run(ClientCommand::Whoami).await.unwrap();
        assert!(out.contains("admin@kangan.edu.au"));
    }

    #[tokio::test]
    async fn register_needs_admin_and_a_long_enough_password() {
        let mut c = client().await;
        let register = |password: &str| ClientCommand::Register {
            email: "new@kangan.edu.au".into(),
            password: password.into(),
            name: "New Student".into(),
            role: UserRole::Student,
        };

        assert!(c.run(register("secret1")).await.is_err());

        login_admin(&mut c).await;
        assert!(c.run(register("short")).await.is_err());
        let out = c.run(register("secret1")).await.unwrap();
        assert!(out.starts_with("Created student new@kangan.edu.au"));
    }

    #[tokio::test]
    async fn logs_list_is_admin_only_and_stats_hide_users_from_students() {
        let mut c = client().await;
        c.run(ClientCommand::Login {
            email: "student@kangan.edu.au".into(),
            password: "student123".into(),
        })
        .await
        .unwrap();

        let listing = c
            .run(ClientCommand::Logs(LogsCommand::List {
                filter: LogFilter::All,
                limit: 10,
            }))
            .await;
        assert!(listing.is_err());

        let stats = c.run(ClientCommand::Logs(LogsCommand::Stats)).await.unwrap();
        assert!(stats.starts_with("Total logs: 1"));
        assert!(!stats.contains("User activity"));
    }

    #[tokio::test]
    async fn passwd_changes_the_secret() {
        let mut c = client().await;
        login_admin(&mut c).await;
        c.run(ClientCommand::Passwd {
            current: "admin123".into(),
            new: "admin456".into(),
        })
        .await
        .unwrap();
        c.run(ClientCommand::Logout).await.unwrap();

        let old = c
            .run(ClientCommand::Login {
                email: "admin@kangan.edu.au".into(),
                password: "admin123".into(),
            })
            .await;
        assert!(old.is_err());
    }

    #[test]
    fn seasons_lists_all_seven_or_one() {
        assert_eq!(seasons(None).matches("Weather:").count(), 7);
        let one = seasons(Some(SeasonName::Guling));
        assert!(one.starts_with("Guling"));
    }
}
