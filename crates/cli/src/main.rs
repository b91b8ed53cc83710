//! Study assistant CLI: turn study materials into a grounded chat and
//! export the conversation as a PDF.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kitty_chat::{ChatClient, ChatConfig};
use kitty_core::{ChatTurn, Role, Transcript, UploadedFile, DEFAULT_ASSISTANT_NAME, DEFAULT_PERSONA};
use kitty_export::{TextExporter, EXPORT_FILENAME};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

/// File name used for the JSON copy of a saved transcript.
const TRANSCRIPT_FILENAME: &str = "learn-from-kitty-chat.json";

/// Study with Kitty: ask questions answered only from your own materials.
#[derive(Parser, Debug)]
#[command(name = "study-kitty")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// How an exported transcript is laid out.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ExportMode {
    /// Re-typeset the messages as wrapped text
    #[default]
    Text,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and combine study materials into one plain-text context
    Extract {
        /// Study files (.txt, .md, .csv, .pdf, .docx, .pptx, .doc)
        files: Vec<PathBuf>,

        /// Pasted notes placed before the file contents
        #[arg(short, long, default_value = "")]
        text: String,

        /// Write the context to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a saved JSON transcript as a PDF
    Export {
        /// Transcript JSON (an array of {role, content} turns)
        transcript: PathBuf,

        /// Output directory (default: same as the transcript)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name used to label assistant messages
        #[arg(long, default_value = DEFAULT_ASSISTANT_NAME)]
        assistant_name: String,

        /// Layout strategy
        #[arg(short, long, value_enum, default_value_t = ExportMode::Text)]
        mode: ExportMode,
    },

    /// Start an interactive study session
    Chat {
        /// Study files (.txt, .md, .csv, .pdf, .docx, .pptx, .doc)
        files: Vec<PathBuf>,

        /// Pasted notes placed before the file contents
        #[arg(short, long, default_value = "")]
        text: String,

        /// Instruction describing how the assistant should behave
        #[arg(short, long)]
        persona: Option<String>,

        /// Directory where /save writes the transcript
        #[arg(short, long, default_value = ".")]
        save: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Extract {
            files,
            text,
            output,
        } => run_extract(&files, &text, output.as_deref(), args.verbose).await,
        Command::Export {
            transcript,
            output,
            assistant_name,
            mode,
        } => run_export(&transcript, output.as_deref(), &assistant_name, mode, args.verbose),
        Command::Chat {
            files,
            text,
            persona,
            save,
        } => run_chat(&files, &text, persona, &save).await,
    }
}

/// Read every input path into memory.
fn load_files(paths: &[PathBuf]) -> Result<Vec<UploadedFile>> {
    paths
        .iter()
        .map(|path| {
            UploadedFile::from_path(path).with_context(|| format!("Failed to open {}", path.display()))
        })
        .collect()
}

/// Extract and combine all materials.
async fn load_materials(paths: &[PathBuf], text: &str) -> Result<String> {
    let files = load_files(paths)?;
    log::debug!("Extracting {} file(s)", files.len());
    kitty_extract::prepare_materials(text, files)
        .await
        .context("Error reading files")
}

async fn run_extract(paths: &[PathBuf], text: &str, output: Option<&Path>, verbose: bool) -> Result<()> {
    let context = load_materials(paths, text).await?;

    match output {
        Some(path) => {
            write_output(path, &context)?;
            if verbose {
                eprintln!("Written to: {}", path.display());
            }
        }
        None => println!("{}", context),
    }

    Ok(())
}

fn run_export(
    transcript_path: &Path,
    output_dir: Option<&Path>,
    assistant_name: &str,
    mode: ExportMode,
    verbose: bool,
) -> Result<()> {
    let json = std::fs::read_to_string(transcript_path)
        .with_context(|| format!("Failed to read {}", transcript_path.display()))?;
    let transcript = Transcript::from_json(&json)
        .with_context(|| format!("Invalid transcript {}", transcript_path.display()))?;

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => transcript_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let path = match mode {
        ExportMode::Text => export_pdf(&transcript, &dir, assistant_name)?,
    };
    if verbose {
        eprintln!("Written to: {}", path.display());
    }
    Ok(())
}

/// Lay out the transcript and write it as `EXPORT_FILENAME` inside `dir`.
fn export_pdf(transcript: &Transcript, dir: &Path, assistant_name: &str) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    let path = dir.join(EXPORT_FILENAME);

    let document = TextExporter::new()
        .with_assistant_name(assistant_name)
        .export(transcript.turns());
    document
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::debug!("Exported {} page(s) to {}", document.page_count(), path.display());
    Ok(path)
}

async fn run_chat(paths: &[PathBuf], text: &str, persona: Option<String>, save_dir: &Path) -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ChatConfig::from_env()?;
    let client = ChatClient::new(config);

    let context = load_materials(paths, text).await?;
    eprintln!("Loaded {} characters of study material.", context.len());

    let mut persona = persona.unwrap_or_else(|| DEFAULT_PERSONA.to_string());
    let mut transcript = Transcript::with_greeting();
    print_turn(&transcript.turns()[0]);
    eprintln!("Commands: /persona <text>, /save, /reset, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        std::io::stderr().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ').map_or((input, ""), |(c, rest)| (c, rest.trim())) {
            ("/quit", _) | ("/exit", _) => break,
            ("/save", _) => match save_transcript(&transcript, save_dir) {
                Ok(path) => eprintln!("Saved chat to {}", path.display()),
                Err(e) => eprintln!("Error: {:#}", e),
            },
            ("/reset", _) => {
                transcript = Transcript::with_greeting();
                print_turn(&transcript.turns()[0]);
            }
            ("/persona", "") => eprintln!("Current persona: {}", persona),
            ("/persona", new_persona) => {
                persona = new_persona.to_string();
                eprintln!("Persona updated.");
            }
            _ => {
                transcript.push(ChatTurn::user(input));
                match client.respond(&context, &persona, transcript.turns()).await {
                    Ok(reply) => {
                        let turn = ChatTurn::assistant(reply);
                        print_turn(&turn);
                        transcript.push(turn);
                    }
                    Err(e) => eprintln!("Error: Failed to get a response: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Save the transcript as both PDF and JSON, returning the PDF path.
fn save_transcript(transcript: &Transcript, dir: &Path) -> Result<PathBuf> {
    let pdf = export_pdf(transcript, dir, DEFAULT_ASSISTANT_NAME)?;
    write_output(&dir.join(TRANSCRIPT_FILENAME), &transcript.to_json()?)?;
    Ok(pdf)
}

fn print_turn(turn: &ChatTurn) {
    match turn.role {
        Role::User => println!("You: {}", turn.content),
        Role::Assistant => println!("{}: {}\n", DEFAULT_ASSISTANT_NAME, turn.content),
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("study-kitty-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_transcript_writes_pdf_and_json() {
        let dir = scratch_dir("save");
        let mut transcript = Transcript::with_greeting();
        transcript.push(ChatTurn::user("What is a ribosome?"));
        transcript.push(ChatTurn::assistant("A protein factory."));

        let pdf = save_transcript(&transcript, &dir).unwrap();
        assert_eq!(pdf, dir.join(EXPORT_FILENAME));
        assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));

        let json = std::fs::read_to_string(dir.join(TRANSCRIPT_FILENAME)).unwrap();
        assert_eq!(Transcript::from_json(&json).unwrap(), transcript);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_load_materials_combines_text_and_files() {
        let dir = scratch_dir("materials");
        let notes = dir.join("notes.txt");
        std::fs::write(&notes, "A").unwrap();

        let context = load_materials(&[notes], "B").await.unwrap();
        assert_eq!(context, "B\n\nA");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_mode_defaults_to_text() {
        let args = Args::parse_from(["study-kitty", "export", "chat.json"]);
        match args.command {
            Command::Export { mode, .. } => assert_eq!(mode, ExportMode::Text),
            other => panic!("expected export, got {:?}", other),
        }

        let args = Args::parse_from(["study-kitty", "export", "chat.json", "--mode", "text"]);
        assert!(matches!(args.command, Command::Export { mode: ExportMode::Text, .. }));
        assert!(Args::try_parse_from(["study-kitty", "export", "chat.json", "--mode", "visual"]).is_err());
    }

    #[test]
    fn test_run_export_writes_pdf_next_to_transcript() {
        let dir = scratch_dir("export");
        let transcript_path = dir.join("chat.json");
        let mut transcript = Transcript::with_greeting();
        transcript.push(ChatTurn::user("Define osmosis"));
        std::fs::write(&transcript_path, transcript.to_json().unwrap()).unwrap();

        run_export(&transcript_path, None, DEFAULT_ASSISTANT_NAME, ExportMode::Text, false).unwrap();
        assert!(std::fs::read(dir.join(EXPORT_FILENAME)).unwrap().starts_with(b"%PDF"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_files(&[PathBuf::from("/definitely/not/here.txt")]).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
