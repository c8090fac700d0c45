//! Subcommands and what each one mounts
//!
//! Every subcommand is a page: it names the route it renders, the gate is
//! checked for that route, and only then is page data fetched. A redirect
//! ends the command with `Error::AccessDenied` before any request is sent.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use common::Secret;
use recruit_client::{
    Application, ApplicationQuery, ApplicationStatus, ContractType, HttpClient, JobOffer,
    JobQuery, JobStatus, Listing, NewJobOffer, Notification, Payment, PaymentStatus,
    ProfileUpdate, RegisterRequest, RoleProfile, parse_skills,
};
use recruit_session::{
    GateDecision, Identity, NavigationLog, Navigator, Role, RoleGate, Route,
};
use serde::de::DeserializeOwned;

use crate::error::Error;

#[derive(Parser, Debug)]
#[command(name = "recruit", about = "Recruitsss marketplace from the command line")]
pub struct Cli {
    /// Config file (default: recruit.toml, or CONFIG_PATH)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session tokens
    Login {
        email: String,
        #[arg(long, env = "RECRUIT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create a candidate or recruiter account
    Register(RegisterArgs),
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update your own profile
    Profile(ProfileArgs),
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Apply to a job offer as a candidate
    Apply {
        job_id: String,
        #[arg(long)]
        cover_letter: Option<String>,
    },
    #[command(subcommand)]
    Applications(ApplicationsCommand),
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Bookmarked job offers
    #[command(subcommand)]
    Saved(SavedCommand),
    /// Your subscription payments
    Payments,
    #[command(subcommand)]
    Admin(AdminCommand),
}

impl Command {
    /// Commands that start from a fresh session don't restore the old one.
    pub fn restores_session(&self) -> bool {
        !matches!(self, Command::Login { .. } | Command::Register(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AccountKind {
    Candidate,
    Recruiter,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "RECRUIT_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long, value_enum, default_value_t = AccountKind::Candidate)]
    role: AccountKind,
    #[arg(long)]
    bio: Option<String>,
    /// Comma-separated
    #[arg(long, default_value = "")]
    skills: String,
    #[arg(long, default_value_t = 0)]
    experience_years: u32,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    company_description: Option<String>,
    #[arg(long)]
    industry: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

/// Parse a backend enum from its wire spelling, case-insensitively.
fn parse_wire<T: DeserializeOwned>(raw: &str) -> std::result::Result<T, String> {
    let wire = raw.trim().to_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(wire))
        .map_err(|_| format!("unknown value: {raw}"))
}

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    /// Browse published offers
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, value_parser = parse_wire::<ContractType>)]
        contract: Option<ContractType>,
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        page: Option<u32>,
    },
    Show {
        id: String,
    },
    /// Create a draft offer
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, value_parser = parse_wire::<ContractType>)]
        contract: Option<ContractType>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        remote: bool,
        /// Comma-separated
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long)]
        salary_min: Option<f64>,
        #[arg(long)]
        salary_max: Option<f64>,
        #[arg(long)]
        currency: Option<String>,
    },
    Publish {
        id: String,
    },
    Close {
        id: String,
    },
    /// Your own offers, drafts included
    Mine,
}

#[derive(Subcommand, Debug)]
pub enum ApplicationsCommand {
    List {
        #[arg(long, value_parser = parse_wire::<ApplicationStatus>)]
        status: Option<ApplicationStatus>,
        #[arg(long)]
        job: Option<String>,
    },
    Mine,
    Show {
        id: String,
    },
    Withdraw {
        id: String,
    },
    View {
        id: String,
    },
    Shortlist {
        id: String,
    },
    Interview {
        id: String,
        /// ISO-8601, e.g. 2026-11-02T10:00:00Z
        #[arg(long)]
        date: String,
    },
    Accept {
        id: String,
    },
    Reject {
        id: String,
    },
    Note {
        id: String,
        #[arg(long)]
        text: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List {
        #[arg(long)]
        unread: bool,
    },
    Read {
        id: String,
    },
    ReadAll,
    Unread,
}

#[derive(Subcommand, Debug)]
pub enum SavedCommand {
    List,
    Add { job_id: String },
    Remove { saved_id: String },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    Users {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        page: Option<u32>,
    },
    Jobs {
        #[arg(long, value_parser = parse_wire::<JobStatus>)]
        status: Option<JobStatus>,
        #[arg(long)]
        page: Option<u32>,
    },
    Payments {
        #[arg(long, value_parser = parse_wire::<PaymentStatus>)]
        status: Option<PaymentStatus>,
    },
}

/// Everything a command needs: the client and the session around it.
pub struct App {
    pub client: HttpClient,
    pub gate: RoleGate,
    pub navigator: Arc<NavigationLog>,
}

impl App {
    /// Run the page gate for `route`.
    fn mount(&self, route: Route) -> crate::error::Result<Option<Identity>> {
        match self
            .gate
            .mount(self.client.session(), &route, self.navigator.as_ref())
        {
            GateDecision::Render(identity) => Ok(identity),
            GateDecision::Redirect(target) => Err(Error::AccessDenied {
                page: route.path(),
                redirect: target.path(),
            }),
        }
    }
}

fn password(given: Option<String>) -> crate::error::Result<Secret<String>> {
    given
        .filter(|p| !p.is_empty())
        .map(Secret::new)
        .ok_or(Error::MissingPassword)
}

pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password: given } => {
            app.mount(Route::login())?;
            let password = password(given)?;
            let response = app
                .client
                .login(&email, &password)
                .await
                .context("login failed")?;
            println!("Signed in as {} ({})", response.user.display_name(), response.user.role);
        }
        Command::Register(args) => register(app, args).await?,
        Command::Logout => {
            app.client.logout().await;
            println!("Signed out");
        }
        Command::Whoami => match app.client.session().identity() {
            Some(user) => print_identity(&user),
            None => println!("Not signed in"),
        },
        Command::Profile(args) => {
            let route = match app.client.session().role() {
                Some(Role::Recruiter) => Route::RecruiterProfile,
                _ => Route::CandidateProfile,
            };
            app.mount(route)?;
            let update = ProfileUpdate {
                first_name: args.first_name,
                last_name: args.last_name,
                phone: args.phone,
            };
            let user = app
                .client
                .update_profile(&update)
                .await
                .context("failed to update profile")?;
            print_identity(&user);
        }
        Command::Jobs(command) => jobs(app, command).await?,
        Command::Apply {
            job_id,
            cover_letter,
        } => apply(app, &job_id, cover_letter.as_deref()).await?,
        Command::Applications(command) => applications(app, command).await?,
        Command::Notifications(command) => notifications(app, command).await?,
        Command::Saved(command) => saved(app, command).await?,
        Command::Payments => {
            app.mount(Route::Payments)?;
            let payments = app
                .client
                .my_payments()
                .await
                .context("failed to load payments")?;
            print_payments(&payments);
        }
        Command::Admin(command) => admin(app, command).await?,
    }
    Ok(())
}

async fn register(app: &App, args: RegisterArgs) -> Result<()> {
    app.mount(Route::Register)?;
    let password = password(args.password)?;
    let profile = match args.role {
        AccountKind::Candidate => RoleProfile::Candidate {
            bio: args.bio,
            skills: parse_skills(&args.skills),
            experience_years: args.experience_years,
            location: args.location,
        },
        AccountKind::Recruiter => RoleProfile::Recruiter {
            company_name: args
                .company_name
                .ok_or_else(|| Error::InvalidArgument("--company-name is required".into()))?,
            company_description: args.company_description,
            industry: args.industry,
        },
    };
    let request = RegisterRequest {
        email: args.email,
        password_confirm: password.clone(),
        password,
        first_name: args.first_name,
        last_name: args.last_name,
        phone: args.phone,
        profile,
    };
    let response = app
        .client
        .register(&request)
        .await
        .context("registration failed")?;
    println!(
        "Registered {} as {}",
        response.user.email, response.user.role
    );
    if let Some(message) = response.message {
        println!("{message}");
    }
    Ok(())
}

async fn jobs(app: &App, command: JobsCommand) -> Result<()> {
    match command {
        JobsCommand::List {
            search,
            location,
            contract,
            remote,
            page,
        } => {
            app.mount(Route::Jobs)?;
            let query = JobQuery {
                search,
                location,
                contract_type: contract,
                is_remote: remote.then_some(true),
                page,
                ..JobQuery::default()
            };
            let listing = app.client.jobs(&query).await.context("failed to list jobs")?;
            print_jobs(&listing);
        }
        JobsCommand::Show { id } => {
            app.mount(Route::JobDetail(id.clone()))?;
            let job = app.client.job(&id).await.context("failed to load job")?;
            print_job_detail(&job);
        }
        JobsCommand::Create {
            title,
            description,
            contract,
            location,
            remote,
            skills,
            salary_min,
            salary_max,
            currency,
        } => {
            app.mount(Route::JobCreate)?;
            let job = NewJobOffer {
                title,
                description,
                contract_type: contract,
                location,
                is_remote: remote,
                skills_required: parse_skills(&skills),
                salary_min,
                salary_max,
                salary_currency: currency,
                ..NewJobOffer::default()
            };
            let created = app
                .client
                .create_job(&job)
                .await
                .context("failed to create job")?;
            println!("Created draft {} ({})", created.id, created.title);
        }
        JobsCommand::Publish { id } => {
            app.mount(Route::JobCreate)?;
            let ack = app
                .client
                .publish_job(&id)
                .await
                .context("failed to publish job")?;
            println!("{}", ack.message.unwrap_or_else(|| format!("Published {id}")));
        }
        JobsCommand::Close { id } => {
            app.mount(Route::JobCreate)?;
            let ack = app
                .client
                .close_job(&id)
                .await
                .context("failed to close job")?;
            println!("{}", ack.message.unwrap_or_else(|| format!("Closed {id}")));
        }
        JobsCommand::Mine => {
            app.mount(Route::Dashboard(Role::Recruiter))?;
            let listing = app.client.my_jobs().await.context("failed to list your jobs")?;
            print_jobs(&listing);
        }
    }
    Ok(())
}

async fn apply(app: &App, job_id: &str, cover_letter: Option<&str>) -> Result<()> {
    let page = Route::JobDetail(job_id.to_string());
    let identity = app.mount(page.clone())?;
    match identity {
        None => {
            let target = Route::Login {
                return_to: Some(page.path()),
            };
            app.navigator.navigate(&target);
            return Err(Error::AccessDenied {
                page: page.path(),
                redirect: target.path(),
            }
            .into());
        }
        Some(user) if user.role != Role::Candidate => {
            return Err(Error::InvalidArgument("only candidates can apply to jobs".into()).into());
        }
        Some(_) => {}
    }
    let application = app
        .client
        .apply(job_id, cover_letter)
        .await
        .context("failed to apply")?;
    println!("Applied: {} ({})", application.id, application.status);
    Ok(())
}

async fn applications(app: &App, command: ApplicationsCommand) -> Result<()> {
    app.mount(Route::Applications)?;
    let client = &app.client;
    let ack = match command {
        ApplicationsCommand::List { status, job } => {
            let query = ApplicationQuery {
                status,
                job_offer: job,
                ..ApplicationQuery::default()
            };
            let listing = client
                .applications(&query)
                .await
                .context("failed to list applications")?;
            print_applications(&listing);
            return Ok(());
        }
        ApplicationsCommand::Mine => {
            let listing = client
                .my_applications()
                .await
                .context("failed to list your applications")?;
            print_applications(&listing);
            return Ok(());
        }
        ApplicationsCommand::Show { id } => {
            let application = client
                .application(&id)
                .await
                .context("failed to load application")?;
            print_application(&application);
            return Ok(());
        }
        ApplicationsCommand::Note { id, text } => {
            let application = client
                .annotate_application(&id, &text)
                .await
                .context("failed to save notes")?;
            print_application(&application);
            return Ok(());
        }
        ApplicationsCommand::Withdraw { id } => client.withdraw_application(&id).await,
        ApplicationsCommand::View { id } => client.mark_application_viewed(&id).await,
        ApplicationsCommand::Shortlist { id } => client.shortlist_application(&id).await,
        ApplicationsCommand::Interview { id, date } => client.schedule_interview(&id, &date).await,
        ApplicationsCommand::Accept { id } => client.accept_application(&id).await,
        ApplicationsCommand::Reject { id } => client.reject_application(&id).await,
    }
    .context("application update failed")?;
    println!("{}", ack.message.unwrap_or_else(|| "Done".into()));
    Ok(())
}

async fn notifications(app: &App, command: NotificationsCommand) -> Result<()> {
    app.mount(Route::Notifications)?;
    match command {
        NotificationsCommand::List { unread } => {
            let listing = app
                .client
                .notifications(unread)
                .await
                .context("failed to load notifications")?;
            print_notifications(&listing);
        }
        NotificationsCommand::Read { id } => {
            app.client
                .mark_notification_read(&id)
                .await
                .context("failed to mark notification read")?;
            println!("Marked {id} as read");
        }
        NotificationsCommand::ReadAll => {
            app.client
                .mark_all_notifications_read()
                .await
                .context("failed to mark notifications read")?;
            println!("All notifications marked as read");
        }
        NotificationsCommand::Unread => {
            let count = app
                .client
                .unread_notification_count()
                .await
                .context("failed to count notifications")?;
            println!("{count}");
        }
    }
    Ok(())
}

async fn saved(app: &App, command: SavedCommand) -> Result<()> {
    app.mount(Route::Dashboard(Role::Candidate))?;
    match command {
        SavedCommand::List => {
            let listing = app
                .client
                .saved_jobs()
                .await
                .context("failed to load saved jobs")?;
            for saved in listing.items() {
                let title = saved
                    .job_details
                    .as_ref()
                    .map(|job| job.title.as_str())
                    .unwrap_or("-");
                println!(
                    "{}\t{}\t{title}",
                    saved.id,
                    saved.job_offer.as_deref().unwrap_or("-")
                );
            }
        }
        SavedCommand::Add { job_id } => {
            let saved = app
                .client
                .save_job(&job_id)
                .await
                .context("failed to save job")?;
            println!("Saved as {}", saved.id);
        }
        SavedCommand::Remove { saved_id } => {
            app.client
                .unsave_job(&saved_id)
                .await
                .context("failed to remove saved job")?;
            println!("Removed {saved_id}");
        }
    }
    Ok(())
}

async fn admin(app: &App, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Users { role, page } => {
            app.mount(Route::AdminUsers)?;
            let users = app
                .client
                .users(role, page)
                .await
                .context("failed to list users")?;
            for user in users.items() {
                println!(
                    "{}\t{}\t{}\t{:?}",
                    user.id, user.email, user.role, user.status
                );
            }
            print_total(&users);
        }
        AdminCommand::Jobs { status, page } => {
            app.mount(Route::AdminJobs)?;
            let query = JobQuery {
                status,
                page,
                ..JobQuery::default()
            };
            let listing = app.client.jobs(&query).await.context("failed to list jobs")?;
            print_jobs(&listing);
        }
        AdminCommand::Payments { status } => {
            app.mount(Route::AdminPayments)?;
            let payments = app
                .client
                .payments(status)
                .await
                .context("failed to list payments")?;
            print_payments(&payments);
        }
    }
    Ok(())
}

fn print_identity(user: &Identity) {
    println!("{} <{}>", user.display_name(), user.email);
    println!("role: {}", user.role);
    println!(
        "status: {:?}{}",
        user.status,
        if user.email_verified { ", verified" } else { "" }
    );
}

fn print_total<T>(listing: &Listing<T>) {
    if listing.has_more() {
        println!("({} of {})", listing.items().len(), listing.total());
    }
}

fn print_jobs(listing: &Listing<JobOffer>) {
    for job in listing.items() {
        println!(
            "{}\t{}\t{}\t{}",
            job.id,
            job.title,
            job.company().unwrap_or("-"),
            job.location.as_deref().unwrap_or(if job.is_remote { "remote" } else { "-" })
        );
    }
    print_total(listing);
}

fn print_job_detail(job: &JobOffer) {
    println!("{}", job.title);
    if let Some(company) = job.company() {
        println!("company: {company}");
    }
    if let Some(salary) = job.salary_range() {
        println!("salary: {salary}");
    }
    if !job.skills_required.is_empty() {
        println!("skills: {}", job.skills_required.join(", "));
    }
    println!();
    println!("{}", job.description);
}

fn print_application(application: &Application) {
    let job = application
        .job_info
        .as_ref()
        .map(|info| info.title.as_str())
        .unwrap_or("-");
    let candidate = application
        .candidate_info
        .as_ref()
        .map(|info| info.full_name.as_str())
        .unwrap_or("-");
    println!("{}\t{job}\t{candidate}\t{}", application.id, application.status);
}

fn print_applications(listing: &Listing<Application>) {
    for application in listing.items() {
        print_application(application);
    }
    print_total(listing);
}

fn print_notifications(listing: &Listing<Notification>) {
    for notification in listing.items() {
        let marker = if notification.read { " " } else { "*" };
        println!("{marker} {}\t{}", notification.id, notification.title);
    }
    print_total(listing);
}

fn print_payments(listing: &Listing<Payment>) {
    for payment in listing.items() {
        let amount = payment
            .amount
            .map(|a| format!("{a:.2}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "{}\t{amount} {}\t{:?}",
            payment.id, payment.currency, payment.status
        );
    }
    print_total(listing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn wire_values_parse_case_insensitively() {
        assert_eq!(parse_wire::<ContractType>("cdi"), Ok(ContractType::Cdi));
        assert_eq!(
            parse_wire::<ApplicationStatus>("interview-scheduled"),
            Ok(ApplicationStatus::InterviewScheduled)
        );
        assert!(parse_wire::<JobStatus>("nonsense").is_err());
    }

    #[test]
    fn login_and_register_skip_rehydration() {
        let cli = Cli::parse_from(["recruit", "login", "a@example.com", "--password", "x"]);
        assert!(!cli.command.restores_session());
        let cli = Cli::parse_from(["recruit", "jobs", "list", "--remote"]);
        assert!(cli.command.restores_session());
    }

    #[test]
    fn admin_role_filter_parses() {
        let cli = Cli::parse_from(["recruit", "admin", "users", "--role", "recruiter"]);
        match cli.command {
            Command::Admin(AdminCommand::Users { role, .. }) => {
                assert_eq!(role, Some(Role::Recruiter))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_password_counts_as_missing() {
        assert!(matches!(password(Some(String::new())), Err(Error::MissingPassword)));
        assert!(matches!(password(None), Err(Error::MissingPassword)));
        assert_eq!(password(Some("pw".into())).unwrap().expose(), "pw");
    }
}
