//! vitta - financial assistant chat CLI

mod auth;
mod config;

use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;

use vitta_api::{ApiClient, FormClient, RenewalStatus};
use vitta_chat::{Author, ChatController, ChatEvent, RemoteBackend};

/// vitta - chat with your financial assistant
#[derive(Parser, Debug)]
#[command(name = "vitta")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,

    /// Log in (prompts for credentials)
    #[arg(long)]
    login: bool,

    /// Log out and clear the stored session
    #[arg(long)]
    logout: bool,

    /// Show login status
    #[arg(long)]
    auth_status: bool,

    /// List stored policies and exit
    #[arg(long)]
    policies: bool,

    /// Delete a policy by key and exit
    #[arg(long, value_name = "KEY")]
    delete_policy: Option<String>,

    /// Import a policy from an uploaded document
    #[arg(long, num_args = 2, value_names = ["NAME", "LINK"])]
    import_policy: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("vitta=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let mut session = auth::SessionContext::new();

    if args.login {
        return handle_login(&mut session);
    }

    if args.logout {
        session.logout()?;
        println!("Logged out.");
        return Ok(());
    }

    if args.auth_status {
        return show_auth_status(&session);
    }

    // Everything past this point talks to the backend
    let cfg = config::Config::load();
    let api = ApiClient::new(cfg.api_config())?;

    if args.policies {
        return list_policies(&api).await;
    }

    if let Some(key) = args.delete_policy {
        return delete_policy(&api, &key).await;
    }

    if let Some(pair) = args.import_policy {
        let [name, link] = pair.as_slice() else {
            anyhow::bail!("--import-policy takes a document name and a link");
        };
        api.extract_policy(name, link).await?;
        println!("Policy document accepted for extraction: {}", name);
        return Ok(());
    }

    if !session.is_authenticated() {
        eprintln!("Error: not logged in");
        eprintln!();
        eprintln!("Log in with: vitta --login");
        std::process::exit(1);
    }

    let forms = FormClient::new(cfg.form_config())?;
    let controller = Arc::new(ChatController::new(Arc::new(RemoteBackend::new(api, forms))));

    run_interactive(controller).await
}

async fn run_interactive(controller: Arc<ChatController>) -> anyhow::Result<()> {
    let mut events = controller.subscribe();

    // Print assistant output as it lands, independent of the input loop
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ChatEvent::MessageAppended { message, .. } => {
                    if message.author == Author::Assistant {
                        if message.is_error {
                            eprintln!("! {}", message.content);
                        } else {
                            println!("{}", message.content);
                        }
                    }
                }
                ChatEvent::Composing { active } => {
                    if active {
                        println!("...");
                    }
                }
                ChatEvent::ModeChanged { .. } => {}
            }
        }
    });

    println!("vitta - type /help for commands");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            if !run_command(&controller, command).await {
                break;
            }
            continue;
        }

        controller.submit(input).await;
        // Let the printer flush the reply before the next prompt
        tokio::task::yield_now().await;
    }

    printer.abort();
    Ok(())
}

/// Execute a slash command. Returns false when the loop should exit.
async fn run_command(controller: &ChatController, command: &str) -> bool {
    let (name, arg) = match command.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "new" => {
            controller.new_conversation();
            println!("Started a new chat.");
        }
        "list" => {
            let active = controller.active_conversation();
            for (index, conversation) in controller.conversations().iter().enumerate() {
                let marker = if conversation.id == active { "*" } else { " " };
                println!("{} {}: {}", marker, index, conversation.name);
            }
        }
        "switch" => match parse_index(controller, arg) {
            Some(id) => {
                controller.switch_conversation(id);
                for message in controller.transcript(id) {
                    let who = if message.is_user() { ">" } else { " " };
                    println!("{} [{}] {}", who, message.timestamp, message.content);
                }
            }
            None => println!("Usage: /switch <index> (see /list)"),
        },
        "delete" => match parse_index(controller, arg) {
            Some(id) => {
                controller.delete_conversation(id);
                println!("Deleted.");
            }
            None => println!("Usage: /delete <index> (see /list)"),
        },
        "compare" => {
            controller.quick_action(vitta_chat::canned::COMPARISON_TRIGGER).await;
        }
        "waitlist" => {
            controller.quick_action(vitta_chat::canned::WAITLIST_TRIGGER).await;
        }
        "feedback" => {
            controller.quick_action(vitta_chat::canned::FEEDBACK_TRIGGER).await;
        }
        "help" => {
            println!("Commands:");
            println!("  /new              start a new chat");
            println!("  /list             list chats");
            println!("  /switch <index>   switch to a chat");
            println!("  /delete <index>   delete a chat");
            println!("  /compare          how vitta compares to other assistants");
            println!("  /waitlist         join the waitlist");
            println!("  /feedback         share feedback");
            println!("  /exit             quit");
        }
        "exit" | "quit" => return false,
        _ => {
            println!("Unknown command: /{}", name);
            println!("Type /help for available commands.");
        }
    }
    true
}

fn parse_index(
    controller: &ChatController,
    arg: &str,
) -> Option<vitta_chat::ConversationId> {
    let index: usize = arg.parse().ok()?;
    controller.conversations().get(index).map(|c| c.id)
}

fn handle_login(session: &mut auth::SessionContext) -> anyhow::Result<()> {
    let email = prompt("Email: ")?;
    let password = prompt("Password: ")?;
    let remember = prompt("Remember me? [y/N]: ")?;

    let scope = if remember.eq_ignore_ascii_case("y") {
        auth::TokenScope::Persistent
    } else {
        auth::TokenScope::Process
    };

    match session.login(&email, &password, scope) {
        Ok(issued) => {
            println!("Welcome back, {}!", issued.name);
            if scope == auth::TokenScope::Process {
                println!("Session will not survive this process; re-run with remember me to persist.");
            }
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn show_auth_status(session: &auth::SessionContext) -> anyhow::Result<()> {
    match session.current() {
        Some(token) => println!("Logged in as {} <{}>", token.name, token.email),
        None => {
            println!("Not logged in.");
            println!("Log in with: vitta --login");
        }
    }
    Ok(())
}

async fn list_policies(api: &ApiClient) -> anyhow::Result<()> {
    let policies = api.policies().await?;
    if policies.is_empty() {
        println!("No policies found.");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    println!("{:<20} {:<16} {:<16} Status", "Key", "Type", "Number");
    println!("{}", "-".repeat(70));
    for (key, policy) in &policies {
        let status = match policy.metadata.renewal_status(today) {
            RenewalStatus::Overdue => "renewal overdue".to_string(),
            RenewalStatus::DueSoon { days_left } => {
                format!("renewal due in {} days", days_left)
            }
            RenewalStatus::Active { days_left } => format!("active, {} days left", days_left),
        };
        println!(
            "{:<20} {:<16} {:<16} {}",
            key, policy.metadata.policy_type, policy.metadata.policy_number, status
        );
    }
    Ok(())
}

async fn delete_policy(api: &ApiClient, key: &str) -> anyhow::Result<()> {
    let summary = api.delete_policy(key).await?;
    println!("Deleted policy: {}", key);
    if summary.failed_regenerations > 0 {
        eprintln!(
            "Warning: {} document regenerations failed; dependent answers may be stale",
            summary.failed_regenerations
        );
    }
    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
