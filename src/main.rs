//! KeyRoomBot Telegram Bot
//!
//! Main application entry point

use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::update_listeners::webhooks;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error};

use KeyRoomBot::{
    config::Settings,
    utils::{errors::ErrorSeverity, logging, IntakeError},
    services::ServiceFactory,
    state::{ConversationEngine, EngineOptions, SessionStore},
    i18n::I18n,
    handlers::{handle_callback_query, handle_command, handle_message, Command},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on shutdown
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", KeyRoomBot::info());

    // Initialize i18n system
    info!("Loading translations...");
    let i18n = Arc::new(I18n::new(&settings.i18n)?);

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(bot.clone(), &settings);
    let store = Arc::new(SessionStore::new());
    let engine = Arc::new(ConversationEngine::new(
        store,
        services,
        i18n,
        EngineOptions::from_settings(&settings),
    ));

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Setting up bot handlers...");
    let handler = create_handler();

    // Create dispatcher with dependencies registered
    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![engine])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    match &settings.bot.webhook_url {
        Some(webhook_url) => {
            let address: SocketAddr = settings.bot.webhook_listen_addr.parse()?;
            info!(url = %webhook_url, address = %address, "Starting bot with webhook mode...");

            let options = webhooks::Options::new(address, webhook_url.parse()?);
            let listener = webhooks::axum(bot.clone(), options).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => {
            info!("Starting bot with polling mode...");
            dispatcher.dispatch().await;
        }
    }

    info!("KeyRoomBot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                // Operator and group chats never run the intake flow
                .filter(|msg: Message| msg.chat.is_private())
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle photos, text and other content
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
}

/// Handle bot commands
async fn handle_commands(msg: Message, cmd: Command, engine: Arc<ConversationEngine>) -> HandlerResult {
    report("command", handle_command(msg, cmd, engine).await)
}

/// Handle regular messages
async fn handle_messages(msg: Message, engine: Arc<ConversationEngine>) -> HandlerResult {
    report("message", handle_message(msg, &engine).await)
}

/// Handle callback queries
async fn handle_callbacks(bot: Bot, query: CallbackQuery, engine: Arc<ConversationEngine>) -> HandlerResult {
    report("callback", handle_callback_query(bot, query, &engine).await)
}

/// Log a handler failure by severity; only unrecoverable errors reach the dispatcher
fn report(kind: &str, result: Result<(), IntakeError>) -> HandlerResult {
    let Err(e) = result else {
        return Ok(());
    };

    match e.severity() {
        ErrorSeverity::Info => info!(kind = kind, error = %e, "Handler finished with a user error"),
        ErrorSeverity::Warning => warn!(kind = kind, error = %e, "Handler failed"),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(kind = kind, error = %e, "Handler failed"),
    }

    if e.is_recoverable() {
        Ok(())
    } else {
        Err(e.into())
    }
}
