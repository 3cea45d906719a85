use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{CreateUserCmd, Engine, MoneyCents, RiskManagement, UpdateFinancialProfileCmd};
use sea_orm::{Database, DatabaseConnection};
use migration::MigratorTrait;

#[derive(Parser, Debug)]
#[command(name = "fintrack_admin")]
#[command(about = "Admin utilities for Fintrack (bootstrap users, maintain aggregates)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./fintrack.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Profile(Profile),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    age: Option<i32>,
    /// Opening balance, e.g. `150` or `99.90`.
    #[arg(long, default_value = "0", value_parser = parse_money)]
    initial_balance: MoneyCents,
}

#[derive(Args, Debug)]
struct Profile {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Recompute total income/outcome from the ledger.
    Refresh(ProfileArgs),
    Show(ProfileArgs),
    /// Overwrite the user-editable profile fields (omitted ones are cleared).
    Set(ProfileSetArgs),
}

#[derive(Args, Debug)]
struct ProfileSetArgs {
    #[arg(long)]
    user_id: i64,
    #[arg(long, value_parser = parse_money)]
    monthly_income: Option<MoneyCents>,
    #[arg(long, value_parser = parse_money)]
    current_savings: Option<MoneyCents>,
    #[arg(long, value_parser = parse_money)]
    debt: Option<MoneyCents>,
    #[arg(long)]
    financial_goals: Option<String>,
    /// One of `low`, `medium`, `high`.
    #[arg(long, value_parser = parse_risk)]
    risk: Option<RiskManagement>,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    user_id: i64,
}

fn parse_money(raw: &str) -> Result<MoneyCents, String> {
    raw.parse::<MoneyCents>().map_err(|err| err.to_string())
}

fn parse_risk(raw: &str) -> Result<RiskManagement, String> {
    RiskManagement::try_from(raw.trim().to_lowercase().as_str()).map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            let mut cmd = CreateUserCmd::new(&args.username, password, args.full_name)
                .initial_balance(args.initial_balance);
            if let Some(age) = args.age {
                cmd = cmd.age(age);
            }
            let user = match engine.create_user(cmd).await {
                Ok(user) => user,
                Err(engine::EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };

            println!(
                "created user: {} (id {}, balance {})",
                user.username, user.id, user.balance
            );
        }
        Command::Profile(Profile {
            command: ProfileCommand::Refresh(args),
        }) => {
            let profile = engine.refresh_financial_aggregates(args.user_id).await?;
            println!(
                "user {}: total income {}, total outcome {}",
                args.user_id, profile.total_income, profile.total_outcome
            );
        }
        Command::Profile(Profile {
            command: ProfileCommand::Set(args),
        }) => {
            let cmd = UpdateFinancialProfileCmd {
                user_id: args.user_id,
                monthly_income: args.monthly_income,
                current_savings: args.current_savings,
                debt: args.debt,
                financial_goals: args.financial_goals,
                risk_management: args.risk,
            };
            engine.update_financial_profile(cmd).await?;
            println!("updated financial profile of user {}", args.user_id);
        }
        Command::Profile(Profile {
            command: ProfileCommand::Show(args),
        }) => {
            let detail = engine.user_detail(args.user_id).await?;
            println!(
                "{} ({}), balance {}",
                detail.user.username, detail.user.full_name, detail.user.balance
            );
            match detail.profile {
                Some(profile) => {
                    let show = |value: Option<MoneyCents>| {
                        value.map_or_else(|| "-".to_string(), |v| v.to_string())
                    };
                    println!("  monthly income:  {}", show(profile.monthly_income));
                    println!("  current savings: {}", show(profile.current_savings));
                    println!("  debt:            {}", show(profile.debt));
                    println!("  total income:    {}", profile.total_income);
                    println!("  total outcome:   {}", profile.total_outcome);
                    if let Some(risk) = profile.risk_management {
                        println!("  risk:            {}", risk.as_str());
                    }
                }
                None => println!("  no financial profile"),
            }
        }
    }

    Ok(())
}
