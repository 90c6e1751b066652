//! Command handlers: wire the API client, token store, and chat session to
//! the terminal. The auth gate is evaluated before each command, mirroring
//! the page guard of the original client.

use crate::api::{self, ApiClient};
use crate::auth::{AuthGuard, GuardState, Route, TokenStore};
use crate::chat::{AssistantBackend, ChatSession, HttpBackend, MockBackend};
use crate::cli::output::Output;
use crate::cli::{Cli, CollectionCommands, Commands, DocsCommands, RoleCommands, UserCommands};
use crate::documents;
use crate::types::{
    AppError, CollectionCreate, LoginCredentials, Message, RegisterRequest, Result,
};
use crate::utils::Config;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

/// Screen a command corresponds to, for the auth gate.
fn route_for(command: &Commands) -> Route {
    match command {
        Commands::Login { .. } => Route::Login,
        Commands::Register { .. } => Route::Register,
        Commands::Chat { .. } => Route::Chat,
        Commands::Docs(_) | Commands::Collections(_) => Route::Documents,
        Commands::Users(_) | Commands::Roles(_) => Route::AdminUsers,
        Commands::Logout | Commands::Whoami | Commands::Config => Route::Settings,
    }
}

/// Runs the parsed command against the configured service.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let store = Arc::new(TokenStore::open(config.token_path()));
    let client = ApiClient::new(config.api.base_url.clone(), store.clone());

    match AuthGuard::check(route_for(&cli.command), &store) {
        GuardState::Redirecting(Route::Login) => {
            return Err(AppError::Auth(
                "you are not logged in; run `ragdesk login <username>` first".to_string(),
            ));
        }
        GuardState::Redirecting(_) => {
            // Authenticated visitor on the login/register screen.
            out.info("already logged in; run `ragdesk logout` to switch accounts");
            return Ok(());
        }
        GuardState::Authorized | GuardState::Checking => {}
    }

    match cli.command {
        Commands::Login { username, password } => login(&out, &client, username, password).await,
        Commands::Register {
            username,
            email,
            full_name,
            password,
        } => register(&out, &client, username, email, full_name, password).await,
        Commands::Logout => {
            api::auth::logout(&client).await?;
            out.success("logged out");
            Ok(())
        }
        Commands::Whoami => whoami(&out, &client).await,
        Commands::Docs(command) => docs(&out, &client, command).await,
        Commands::Collections(command) => collections(&out, &client, command).await,
        Commands::Users(command) => users(&out, &client, command).await,
        Commands::Roles(command) => roles(&out, &client, command).await,
        Commands::Chat { mock, live } => {
            let use_mock = if live { false } else { mock || config.chat.mock };
            chat(&out, &client, &config, use_mock).await
        }
        Commands::Config => {
            show_config(&out, &config);
            Ok(())
        }
    }
}

// ============= Auth =============

async fn login(
    out: &Output,
    client: &ApiClient,
    username: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => out
            .prompt("password")
            .ok_or_else(|| AppError::Validation("password is required".to_string()))?,
    };
    if password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let response = api::auth::login(client, &LoginCredentials { username, password }).await?;
    match response.user {
        Some(user) => out.success(&format!("logged in as {}", user.username)),
        None => out.success("logged in"),
    }
    Ok(())
}

async fn register(
    out: &Output,
    client: &ApiClient,
    username: String,
    email: String,
    full_name: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            let first = out
                .prompt("password")
                .ok_or_else(|| AppError::Validation("password is required".to_string()))?;
            let second = out
                .prompt("confirm password")
                .ok_or_else(|| AppError::Validation("password is required".to_string()))?;
            if first != second {
                return Err(AppError::Validation("passwords do not match".to_string()));
            }
            first
        }
    };
    if password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    api::auth::register(
        client,
        &RegisterRequest {
            username: username.clone(),
            email,
            password,
            full_name,
        },
    )
    .await?;
    out.success(&format!("registered and logged in as {}", username));
    Ok(())
}

async fn whoami(out: &Output, client: &ApiClient) -> Result<()> {
    let user = api::auth::me(client).await?;
    out.header("Profile");
    out.kv("username", &user.username);
    out.kv("email", &user.email);
    out.kv("name", &user.full_name);
    out.kv("active", if user.is_active { "yes" } else { "no" });
    Ok(())
}

// ============= Documents =============

async fn docs(out: &Output, client: &ApiClient, command: DocsCommands) -> Result<()> {
    match command {
        DocsCommands::List { search } => {
            let mut list = documents::DocumentList::new();
            if let Some(query) = search {
                list.set_query(query);
            }
            list.refresh(client).await?;
            let docs = list.visible();
            if docs.is_empty() {
                out.info("no documents found");
                return Ok(());
            }
            out.table_header(&["Id", "Title", "Status", "Size", "File"]);
            for doc in docs {
                out.table_row(&[
                    &doc.id.to_string(),
                    &doc.title,
                    &format!(
                        "{} {}",
                        documents::status_glyph(doc.status),
                        documents::status_label(doc.status)
                    ),
                    &documents::format_file_size(doc.file_size),
                    &doc.file_name,
                ]);
            }
            Ok(())
        }
        DocsCommands::Show { id } => {
            let doc = api::documents::get(client, id).await?;
            out.header(&doc.title);
            out.kv("id", &doc.id.to_string());
            out.kv("description", &doc.description);
            out.kv("file", &doc.file_name);
            out.kv("type", &doc.file_type);
            out.kv("size", &documents::format_file_size(doc.file_size));
            out.kv("status", documents::status_label(doc.status));
            if let Some(collection_id) = doc.collection_id {
                out.kv("collection", &collection_id.to_string());
            }
            out.kv("created", &doc.created_at.to_rfc3339());
            Ok(())
        }
        DocsCommands::Upload {
            files,
            title,
            description,
            collection,
        } => {
            let upload = api::documents::DocumentUpload {
                title,
                description,
                collection_id: collection,
                files,
            };
            let doc = api::documents::upload(client, &upload).await?;
            out.success(&format!(
                "uploaded \"{}\" (id {}, {})",
                doc.title,
                doc.id,
                documents::status_label(doc.status)
            ));
            Ok(())
        }
        DocsCommands::Delete { id, yes } => {
            if !yes && !out.confirm(&format!("delete document {}?", id)) {
                out.info("cancelled");
                return Ok(());
            }
            api::documents::delete(client, id).await?;
            out.success(&format!("deleted document {}", id));
            Ok(())
        }
    }
}

async fn collections(out: &Output, client: &ApiClient, command: CollectionCommands) -> Result<()> {
    match command {
        CollectionCommands::List => {
            let collections = api::documents::list_collections(client).await?;
            if collections.is_empty() {
                out.info("no collections");
                return Ok(());
            }
            out.table_header(&["Id", "Name", "Description"]);
            for collection in collections {
                out.table_row(&[
                    &collection.id.to_string(),
                    &collection.name,
                    &collection.description,
                ]);
            }
            Ok(())
        }
        CollectionCommands::Create { name, description } => {
            let collection = api::documents::create_collection(
                client,
                &CollectionCreate { name, description },
            )
            .await?;
            out.success(&format!(
                "created collection \"{}\" (id {})",
                collection.name, collection.id
            ));
            Ok(())
        }
        CollectionCommands::Delete { id, yes } => {
            if !yes && !out.confirm(&format!("delete collection {}?", id)) {
                out.info("cancelled");
                return Ok(());
            }
            api::documents::delete_collection(client, id).await?;
            out.success(&format!("deleted collection {}", id));
            Ok(())
        }
    }
}

// ============= Users & Roles =============

async fn users(out: &Output, client: &ApiClient, command: UserCommands) -> Result<()> {
    match command {
        UserCommands::List => {
            let users = api::users::list(client).await?;
            out.table_header(&["Id", "Username", "Email", "Active"]);
            for user in users {
                out.table_row(&[
                    &user.id.to_string(),
                    &user.username,
                    &user.email,
                    if user.is_active { "yes" } else { "no" },
                ]);
            }
            Ok(())
        }
        UserCommands::Show { id } => {
            let user = api::users::get(client, id).await?;
            out.header(&user.username);
            out.kv("id", &user.id.to_string());
            out.kv("email", &user.email);
            out.kv("name", &user.full_name);
            out.kv("active", if user.is_active { "yes" } else { "no" });
            Ok(())
        }
        UserCommands::Delete { id, yes } => {
            if !yes && !out.confirm(&format!("delete user {}?", id)) {
                out.info("cancelled");
                return Ok(());
            }
            api::users::delete(client, id).await?;
            out.success(&format!("deleted user {}", id));
            Ok(())
        }
    }
}

async fn roles(out: &Output, client: &ApiClient, command: RoleCommands) -> Result<()> {
    match command {
        RoleCommands::List => {
            let roles = api::users::list_roles(client).await?;
            out.table_header(&["Id", "Name", "Description"]);
            for role in roles {
                out.table_row(&[&role.id.to_string(), &role.name, &role.description]);
            }
            Ok(())
        }
    }
}

// ============= Chat =============

async fn chat(out: &Output, client: &ApiClient, config: &Config, use_mock: bool) -> Result<()> {
    let backend: Arc<dyn AssistantBackend> = if use_mock {
        Arc::new(MockBackend::new(Duration::from_millis(
            config.chat.mock_delay_ms,
        )))
    } else {
        Arc::new(HttpBackend::new(client.clone()))
    };

    let mut session = ChatSession::new(backend);
    out.header("Chat");
    if use_mock {
        out.warning("using the in-process mock assistant; replies are canned");
    } else {
        out.info(&format!("assistant backend: {}", session.backend_name()));
    }
    out.hint("type a message and press enter; /quit to exit");
    out.newline();

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "/quit" || line == "/exit" {
            break;
        }

        let before = session.messages().len();
        match session.send(line).await {
            Ok(()) => {
                if let Some(reply) = session.messages().get(before + 1) {
                    print_assistant(out, reply);
                }
            }
            Err(e) => out.error(&e.to_string()),
        }
    }

    out.newline();
    out.info("chat ended; this session is not persisted");
    Ok(())
}

fn print_assistant(out: &Output, message: &Message) {
    out.newline();
    for line in message.content.lines() {
        println!("  {}", line);
    }
    for reference in &message.references {
        out.list_item(&format!(
            "{} (relevance {:.2})",
            reference.title, reference.relevance_score
        ));
    }
    out.newline();
}

// ============= Config =============

fn show_config(out: &Output, config: &Config) {
    out.header("Configuration");
    out.kv("api.base_url", &config.api.base_url);
    out.kv("auth.token_file", &config.token_path().display().to_string());
    out.kv("chat.mock", if config.chat.mock { "true" } else { "false" });
    out.kv(
        "chat.mock_delay_ms",
        &config.chat.mock_delay_ms.to_string(),
    );
}
