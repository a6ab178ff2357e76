mod api;
mod session;

use std::io::{self, BufRead, Write};

use clap::{ArgAction, Args, Parser, Subcommand};

use api::{BridgeClient, CliError};
use session::{ChatSession, Settings, render_failure};

#[derive(Parser, Debug)]
#[command(name = "chatbridge-cli", about = "Terminal front end for the chat bridge")]
struct Cli {
    #[arg(long, env = "CHATBRIDGE_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the backend's diagnostic prompt and print the result.
    Health,
    /// Send one prompt with an optional system instruction.
    Ask {
        prompt: String,
        #[arg(long, default_value = "")]
        system: String,
        #[arg(long)]
        model: Option<String>,
    },
    /// Interactive chat. Commands: /health, /file <name>, /files, /toggle <setting>, /settings, /quit.
    Chat(ChatArgs),
}

#[derive(Args, Debug)]
struct ChatArgs {
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    web_search: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    image_generation: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    data_analysis: bool,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    think: bool,
}

impl From<ChatArgs> for Settings {
    fn from(args: ChatArgs) -> Self {
        Self {
            web_search: args.web_search,
            image_generation: args.image_generation,
            data_analysis: args.data_analysis,
            think: args.think,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let client = BridgeClient::new(&cli.base_url);

    match cli.command {
        Command::Health => run_health(&client).await,
        Command::Ask { prompt, system, model } => run_ask(&client, &prompt, &system, model.as_deref()).await,
        Command::Chat(args) => run_chat(&client, args.into()).await,
    }
}

async fn run_health(client: &BridgeClient) -> Result<(), CliError> {
    match client.health().await {
        Ok(result) => {
            println!("[Health check]\n{result}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", render_failure("Health check failed", &err));
            Err(err)
        }
    }
}

async fn run_ask(client: &BridgeClient, prompt: &str, system: &str, model: Option<&str>) -> Result<(), CliError> {
    match client.message_only(prompt, system, model).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", render_failure("Error while calling backend", &err));
            Err(err)
        }
    }
}

async fn run_chat(client: &BridgeClient, settings: Settings) -> Result<(), CliError> {
    let mut session = ChatSession::new(settings);
    eprintln!("session {}: type /quit to exit", session.session_id());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if let Some(command) = input.strip_prefix('/') {
            let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
            match (name, arg.trim()) {
                ("quit" | "exit", _) => break,
                ("health", _) => {
                    let result = client.health().await;
                    println!("assistant> {}", session.push_health(result));
                }
                ("file", "") => eprintln!("usage: /file <name>"),
                ("file", file) => session.add_file(file),
                ("files", _) => println!("Files: {}", session.uploaded_files().join(", ")),
                ("toggle", setting) => match session.settings.toggle(setting) {
                    Ok(value) => println!("{setting} = {value}"),
                    Err(err) => eprintln!("{err}"),
                },
                ("settings", _) => println!("{:?}", session.settings),
                _ => eprintln!("unknown command: /{name}"),
            }
            continue;
        }

        if !session.push_user(input) {
            continue;
        }
        let reply = client.chat(&session.request()).await;
        println!("assistant> {}", session.push_reply(reply));
    }

    eprintln!("session {} ended after {} messages", session.session_id(), session.messages().len());
    Ok(())
}
