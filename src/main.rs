//! xuri-chat terminal client.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xuri_chat::adapters::{
    DirectoryFileSaver, FileCredentialStore, HttpClient, HttpClientConfig,
    OpenAICompatibleConfig, OpenAICompatibleProvider, ReqwestTransport,
};
use xuri_chat::application::{ChatSettings, ConversationController};
use xuri_chat::config::{AppConfig, AppSettings, LogFormat};
use xuri_chat::domain::conversation::PENDING_PLACEHOLDER;
use xuri_chat::terminal::{self, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.app);

    let controller = build_controller(&config)?;
    tracing::info!(
        endpoint = %config.chat.endpoint,
        model = %config.chat.model,
        "xuri-chat started"
    );

    run(controller).await?;
    Ok(())
}

fn init_tracing(settings: &AppSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn build_controller(
    config: &AppConfig,
) -> Result<ConversationController, Box<dyn std::error::Error>> {
    let transport = Arc::new(ReqwestTransport::new()?);
    let credentials = Arc::new(FileCredentialStore::new(config.http.token_path()));
    let files = Arc::new(DirectoryFileSaver::new(&config.http.download_dir));

    let client = Arc::new(HttpClient::new(
        HttpClientConfig::new(&config.http.base_url).with_timeout(config.http.timeout()),
        transport,
        credentials,
        files,
    ));

    let mut provider_config = OpenAICompatibleConfig::new(&config.chat.endpoint);
    if let Some(key) = &config.chat.api_key {
        provider_config = provider_config.with_api_key(key.clone());
    }
    let provider = Arc::new(OpenAICompatibleProvider::new(provider_config, client));

    let mut settings = ChatSettings::new(&config.chat.model)
        .with_params(config.chat.generation_params())
        .with_history(config.chat.include_history);
    if let Some(prompt) = &config.chat.system_prompt {
        settings = settings.with_system_prompt(prompt);
    }

    Ok(ConversationController::new(provider, settings))
}

async fn run(mut controller: ConversationController) -> std::io::Result<()> {
    println!("{}", terminal::render_welcome());
    println!("{}", terminal::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", terminal::HELP),
            Command::New => {
                let conversation = controller.create_conversation();
                println!("Started {}", conversation.title());
                println!("{}", terminal::GREETING);
            }
            Command::List => println!(
                "{}",
                terminal::render_conversation_list(
                    controller.conversations(),
                    controller.active_id()
                )
            ),
            Command::Select(id) => match controller.select_conversation(id) {
                Ok(()) => print_active(&controller),
                Err(e) => println!("{}", e),
            },
            Command::Delete(id) => match controller.delete_conversation(id) {
                Ok(removed) => {
                    println!("Deleted {}", removed.title());
                    print_active(&controller);
                }
                Err(e) => println!("{}", e),
            },
            Command::Send(text) => {
                let Some(id) = controller.active_id() else {
                    println!("{}", terminal::WELCOME_HINT);
                    continue;
                };
                println!("assistant: {}", PENDING_PLACEHOLDER);
                match controller.send_message(id, &text).await {
                    Ok(reply) => println!("{}", terminal::render_message(&reply)),
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    Ok(())
}

fn print_active(controller: &ConversationController) {
    match controller.active_id() {
        Some(id) => {
            let history = controller.history(id).unwrap_or_default();
            println!("{}", terminal::render_history(history));
        }
        None => println!("{}", terminal::render_welcome()),
    }
}
