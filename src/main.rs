// src/main.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use tiacher::app::handlers::{self, admin, dashboard, editor, login, register};
use tiacher::app::{AppState, Notice, Outcome};
use tiacher::banner;
use tiacher::config::ClientConfig;
use tiacher::exam::ExamDraft;
use tiacher::models::{GenerationKind, Role, User};
use tiacher::upload::FileSelection;

/// Exam generation client for the TIACHER backend.
#[derive(Parser, Debug)]
#[command(name = "tiacher", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login { mail: String, password: String },
    /// Create an account
    Register {
        name: String,
        mail: String,
        password: String,
        confirm: String,
    },
    /// Forget the stored session
    Logout,
    /// List the available models, best first
    Models { search: Option<String> },
    /// Generate an exam from PDF files
    Create {
        /// Model name or id
        #[arg(long)]
        model: Option<String>,
        /// Narrow the model list before picking
        #[arg(long, default_value = "")]
        search: String,
        /// Pick a model automatically from the matches
        #[arg(long)]
        auto: bool,
        #[arg(long = "type", value_enum, default_value = "exam")]
        kind: KindArg,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the exam being edited
    Show,
    /// Change the title, subject or description
    Meta {
        #[arg(value_enum)]
        field: MetaField,
        text: String,
    },
    /// Rewrite a question
    Question { number: u32, text: String },
    /// Rewrite one answer of a question
    Answer { number: u32, id: u32, text: String },
    /// Mark the correct answer of a question
    Correct { number: u32, id: u32 },
    /// Submit the exam and download the PDF
    Save,
    /// List users (admin)
    Users,
    /// Change a user's role (admin): NORMAL, ADMIN or ELIMINADO
    Role { id: u64, role: Role },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Exam,
    Exercise,
}

impl From<KindArg> for GenerationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Exam => GenerationKind::Exam,
            KindArg::Exercise => GenerationKind::Exercise,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum MetaField {
    Title,
    Subject,
    Description,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {}", e);
    }

    let Some(command) = cli.command else {
        banner::print_banner();
        if let Err(e) = Cli::command().print_help() {
            eprintln!("❌ {}", e);
        }
        return ExitCode::SUCCESS;
    };

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Could not open the session store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    report(&run(&mut state, command).await)
}

async fn run(state: &mut AppState, command: Command) -> Outcome {
    match command {
        Command::Login { mail, password } => login::login(state, &mail, &password).await,
        Command::Register {
            name,
            mail,
            password,
            confirm,
        } => register::register(state, &name, &mail, &password, &confirm).await,
        Command::Logout => handlers::logout(state).await,
        Command::Models { search } => show_models(state, search.as_deref()).await,
        Command::Create {
            model,
            search,
            auto,
            kind,
            files,
        } => create(state, model.as_deref(), &search, auto, kind.into(), files).await,
        Command::Show => match editor::open_editor(state) {
            Ok(draft) => {
                print_draft(&draft);
                Outcome::default()
            }
            Err(outcome) => outcome,
        },
        Command::Meta { field, text } => edited(
            editor::edit(state, |draft| {
                match field {
                    MetaField::Title => draft.meta.title = text,
                    MetaField::Subject => draft.meta.subject = text,
                    MetaField::Description => draft.meta.description = text,
                }
                Ok(())
            })
            .await,
        ),
        Command::Question { number, text } => {
            edited(editor::edit(state, |draft| draft.set_question_text(number, text)).await)
        }
        Command::Answer { number, id, text } => {
            edited(editor::edit(state, |draft| draft.set_answer_text(number, id, text)).await)
        }
        Command::Correct { number, id } => {
            edited(editor::edit(state, |draft| draft.mark_correct(number, id)).await)
        }
        Command::Save => match editor::open_editor(state) {
            Ok(draft) => match editor::save_exam(state, &draft).await {
                Ok(path) => Outcome::success(format!(
                    "Exam saved and downloaded to {}",
                    path.display()
                )),
                Err(outcome) => outcome,
            },
            Err(outcome) => outcome,
        },
        Command::Users => match admin::open_admin(state).await {
            Ok(users) => {
                print_users(&users);
                Outcome::default()
            }
            Err(outcome) => outcome,
        },
        Command::Role { id, role } => admin::change_role(state, id, role).await,
    }
}

async fn show_models(state: &AppState, search: Option<&str>) -> Outcome {
    let board = match dashboard::open_dashboard(state).await {
        Ok(board) => board,
        Err(outcome) => return outcome,
    };

    if let Some(email) = &board.email {
        println!("👤 {}{}", email, if board.is_admin { " (admin: `tiacher users`)" } else { "" });
    }
    if board.fallback {
        println!("⚠️  Could not load the model list, showing sample models");
    }

    let hits = board.catalog.search(search.unwrap_or(""));
    if hits.is_empty() {
        return Outcome::warning(dashboard::NO_MATCHING_MODELS);
    }
    for (idx, model) in hits.iter().enumerate() {
        println!("{:>3}. {:<32} {:<28} {}", idx + 1, model.name, model.value, model.logo.path());
    }
    Outcome::default()
}

async fn create(
    state: &mut AppState,
    requested: Option<&str>,
    search: &str,
    auto: bool,
    kind: GenerationKind,
    paths: Vec<PathBuf>,
) -> Outcome {
    let mut files = FileSelection::new();
    let added = files.add(paths);
    if let Some(warning) = added.warning() {
        for path in &added.rejected {
            println!("⚠️  Skipped {}", path.display());
        }
        println!("⚠️  {}", warning);
    }

    let board = match dashboard::open_dashboard(state).await {
        Ok(board) => board,
        Err(outcome) => return outcome,
    };
    let strategy = state.config().auto_select;
    let model = match dashboard::select_model(&board.catalog, search, requested, auto, strategy) {
        Ok(model) => model,
        Err(outcome) => return outcome,
    };

    println!("🤖 Model: {} ({})", model.name, model.value);
    println!("⏳ Generating the exam, please wait...");
    dashboard::generate(state, &model, &files, kind).await
}

fn edited(result: Result<ExamDraft, Outcome>) -> Outcome {
    match result {
        Ok(draft) => {
            print_draft(&draft);
            Outcome::success("Draft updated.")
        }
        Err(outcome) => outcome,
    }
}

fn print_draft(draft: &ExamDraft) {
    println!("📝 {} | {} (exam {})", draft.meta.title, draft.meta.subject, draft.id);
    println!("   {}\n", draft.meta.description);
    for question in &draft.questions {
        println!("{:>3}. {}", question.number, question.text);
        for answer in &question.answers {
            let letter = answer
                .letter()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "?".to_string());
            let mark = if answer.correct { "x" } else { " " };
            println!("      [{}] {}) {}  (id {})", mark, letter, answer.text, answer.id);
        }
    }
}

fn print_users(users: &[User]) {
    println!("{:<6} {:<24} {:<32} {}", "ID", "Name", "Email", "Role");
    for user in users {
        println!("{:<6} {:<24} {:<32} {}", user.id, user.name, user.email, user.role);
    }
}

fn report(outcome: &Outcome) -> ExitCode {
    match &outcome.notice {
        Some(Notice::Success(text)) => println!("✅ {}", text),
        Some(Notice::Warning(text)) => println!("⚠️  {}", text),
        Some(Notice::Error(text)) => eprintln!("❌ {}", text),
        None => {}
    }
    if let Some(screen) = outcome.redirect {
        println!("➡️  Next: {}", screen.command());
    }
    if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
