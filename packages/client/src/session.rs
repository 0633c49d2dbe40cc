//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use joblink_server::infrastructure::dto::websocket::{ClientIntent, RealtimeUpdate};

use crate::{error::ClientError, formatter::MessageFormatter};

/// Commands accepted on the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    JoinProject(String),
    JoinFreelancer(String),
    Leave,
    Quit,
}

/// Parse an input line into a command
///
/// Accepted forms:
/// - `join project <id>` / `join freelancer <id>`
/// - `leave`
/// - `quit` / `exit`
pub fn parse_command(line: &str) -> Result<Command, ClientError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["join", "project", id] => Ok(Command::JoinProject(id.to_string())),
        ["join", "freelancer", id] => Ok(Command::JoinFreelancer(id.to_string())),
        ["leave"] => Ok(Command::Leave),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        _ => Err(ClientError::InvalidCommand(line.to_string())),
    }
}

/// The room the session is currently joined to, tracked client-side so
/// that `leave` can name its target
#[derive(Debug, Clone, PartialEq, Eq)]
enum CurrentRoom {
    Project(String),
    Freelancer(String),
}

/// Translate a command into the intent to send, updating the tracked room
///
/// Returns None when there is nothing to send (e.g. `leave` while not in a
/// room).
fn intent_for(command: &Command, current: &mut Option<CurrentRoom>) -> Option<ClientIntent> {
    match command {
        Command::JoinProject(id) => {
            *current = Some(CurrentRoom::Project(id.clone()));
            Some(ClientIntent::JoinProject {
                project_id: id.clone(),
            })
        }
        Command::JoinFreelancer(id) => {
            *current = Some(CurrentRoom::Freelancer(id.clone()));
            Some(ClientIntent::JoinFreelancer {
                freelancer_id: id.clone(),
            })
        }
        Command::Leave => match current.take() {
            Some(CurrentRoom::Project(id)) => Some(ClientIntent::LeaveProject { project_id: id }),
            Some(CurrentRoom::Freelancer(id)) => Some(ClientIntent::LeaveFreelancer {
                freelancer_id: id,
            }),
            None => {
                println!("Not in a room");
                None
            }
        },
        Command::Quit => None,
    }
}

/// Run the WebSocket client session
///
/// # Arguments
///
/// * `url` - WebSocket URL of the server (e.g. "ws://127.0.0.1:8080/ws")
/// * `initial_command` - Optional join command issued right after connecting
pub async fn run_client_session(
    url: &str,
    initial_command: Option<Command>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    tracing::info!("Connected to realtime server at {}", url);
    println!(
        "\nConnected. Commands: 'join project <id>', 'join freelancer <id>', 'leave', 'quit'.\n"
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming updates
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<RealtimeUpdate>(&text) {
                        Ok(update) => print!("{}", MessageFormatter::format_update(&update)),
                        Err(_) => print!("{}", MessageFormatter::format_raw(&text)),
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to translate commands into intents and send them
    let mut write_task = tokio::spawn(async move {
        let mut current_room: Option<CurrentRoom> = None;
        let mut write_error = false;

        // Auto-join requested on the command line
        if let Some(command) = initial_command {
            if let Some(intent) = intent_for(&command, &mut current_room) {
                if send_intent(&mut write, &intent).await.is_err() {
                    return true;
                }
            }
        }

        while let Some(line) = input_rx.recv().await {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            if let Some(intent) = intent_for(&command, &mut current_room) {
                if send_intent(&mut write, &intent).await.is_err() {
                    write_error = true;
                    break;
                }
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionLost));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionLost));
            }
        }
    }

    Ok(())
}

/// Serialize and send a single intent over the WebSocket
async fn send_intent<S>(write: &mut S, intent: &ClientIntent) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let json = match serde_json::to_string(intent) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize intent: {}", e);
            return Ok(());
        }
    };

    if write.send(Message::Text(json.into())).await.is_err() {
        tracing::warn!("Failed to send intent to server");
        return Err(());
    }

    Ok(())
}
