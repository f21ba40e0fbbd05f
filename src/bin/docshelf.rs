use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use docshelf::config::DEFAULT_DATA_FILE;
use docshelf::{
    DecodedFile, DirectoryDownloads, DocumentManager, FileScope, FileViewer, JsonFileStore,
    PickedFile, StaticAuthProvider, StoreConfig, UserProfile, ViewState,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docshelf", about = "Per-user text documents and file uploads")]
struct Cli {
    /// JSON file holding all stored keys
    #[arg(long, env = "DOCSHELF_DATA", default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Keep uploaded files per user or in one shared collection
    #[arg(long, env = "DOCSHELF_FILE_SCOPE", default_value_t = FileScope::PerUser)]
    file_scope: FileScope,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in as the given identity
    SignIn(SignInArgs),
    /// Sign out and forget the stored session
    SignOut,
    /// Show the signed-in user and the current view
    Status,
    /// Text documents
    #[command(subcommand)]
    Docs(DocsCommand),
    /// Uploaded files
    #[command(subcommand)]
    Files(FilesCommand),
}

#[derive(Args)]
struct SignInArgs {
    #[arg(long)]
    uid: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    photo_url: Option<String>,
}

#[derive(Subcommand)]
enum DocsCommand {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    List,
    Rm { id: String },
}

#[derive(Subcommand)]
enum FilesCommand {
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    List,
    Rm { id: String },
    /// Print a stored file to the terminal
    View { id: String },
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

/// Prints text files and summarizes everything else.
struct TerminalViewer;

impl FileViewer for TerminalViewer {
    fn view(&mut self, name: &str, file: &DecodedFile) {
        println!("{} ({}, {} bytes)", name, file.mime_type, file.len());
        if file.mime_type.starts_with("text/") {
            println!("{}", String::from_utf8_lossy(&file.bytes));
        }
    }
}

fn profile(args: SignInArgs) -> UserProfile {
    let mut profile = UserProfile::new(args.uid);
    profile.display_name = args.name;
    profile.email = args.email;
    profile.photo_url = args.photo_url;
    profile
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docshelf=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match JsonFileStore::open(&cli.data) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = StoreConfig::default().with_file_scope(cli.file_scope);

    match cli.command {
        Command::SignIn(args) => {
            let auth = StaticAuthProvider::new(profile(args));
            let mut app = DocumentManager::new(store, auth, config);
            match app.sign_in() {
                Ok(user) => {
                    println!("Signed in as {}", user.label());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        command => {
            // The session comes from the data file; there is no live provider.
            let mut app = DocumentManager::new(store, StaticAuthProvider::unavailable(), config);
            app.start();
            run(&mut app, command).await
        }
    }
}

async fn run(
    app: &mut DocumentManager<Arc<JsonFileStore>, StaticAuthProvider>,
    command: Command,
) -> ExitCode {
    if let Command::Status = command {
        match (app.user(), app.view_state()) {
            (Some(user), ViewState::Workspace(tab)) => {
                println!("Signed in as {} ({})", user.label(), user.uid);
                println!("Tab: {}", tab);
                println!("Documents: {}", app.documents().len());
                println!("Files: {}", app.files().len());
            }
            _ => println!("Signed out"),
        }
        return ExitCode::SUCCESS;
    }

    if let Command::SignOut = command {
        return match app.sign_out() {
            Ok(()) => {
                println!("Signed out");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if !app.view_state().is_workspace() {
        eprintln!("Error: not signed in (run `docshelf sign-in --uid <id>` first)");
        return ExitCode::FAILURE;
    }

    match command {
        Command::Docs(DocsCommand::Add { title, content }) => {
            if !app.add_document(&title, &content) {
                eprintln!("Error: title and content must both be non-empty");
                return ExitCode::FAILURE;
            }
            if let Some(doc) = app.documents().last() {
                println!("{}", doc.id);
            }
        }
        Command::Docs(DocsCommand::List) => {
            for doc in app.documents() {
                println!("{}\t{}\t{}", doc.id, doc.title, doc.content);
            }
        }
        Command::Docs(DocsCommand::Rm { id }) => {
            if !app.delete_document(&id) {
                eprintln!("Error: no document with id '{}'", id);
                return ExitCode::FAILURE;
            }
        }
        Command::Files(FilesCommand::Upload { paths }) => {
            let mut picked = Vec::with_capacity(paths.len());
            for path in &paths {
                match PickedFile::open(path) {
                    Ok(file) => picked.push(file),
                    Err(e) => {
                        eprintln!("Error: {}: {}", path.display(), e);
                        return ExitCode::FAILURE;
                    }
                }
            }

            let mut failed = false;
            for result in app.upload(picked).await {
                match result {
                    Ok(doc) => println!("{}\t{}\t{}", doc.id, doc.name, doc.display_size()),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        failed = true;
                    }
                }
            }
            if failed {
                return ExitCode::FAILURE;
            }
        }
        Command::Files(FilesCommand::List) => {
            for file in app.files() {
                println!(
                    "{}\t{}\t{}\t{}",
                    file.id,
                    file.name,
                    file.display_size(),
                    file.upload_timestamp
                );
            }
        }
        Command::Files(FilesCommand::Rm { id }) => {
            if !app.delete_file(&id) {
                eprintln!("Error: no file with id '{}'", id);
                return ExitCode::FAILURE;
            }
        }
        Command::Files(FilesCommand::View { id }) => {
            if let Err(e) = app.view_file(&id, &mut TerminalViewer) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        Command::Files(FilesCommand::Download { id, out }) => {
            match app.download_file(&id, &DirectoryDownloads::new(out)) {
                Ok(path) => println!("{}", path.display()),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        Command::SignIn(_) | Command::SignOut | Command::Status => {}
    }

    ExitCode::SUCCESS
}
