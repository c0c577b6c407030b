use anyhow::{Context, Result};
use pragma_editor_config::{EditorConfig, FilePreferences};
use pragma_editor_engine::model::{BlockType, ContentBlock, ContentState};
use pragma_editor_engine::{EditorState, Session, SessionHost, from_html, to_html};
use std::{env, fs, path::Path, process};

/// Nothing is edited from the command line, so changes only get logged.
struct LoggingHost;

impl SessionHost for LoggingHost {
    fn on_change(&mut self, state: &EditorState) {
        log::debug!("Document changed: {} block(s)", state.content().block_count());
    }
}

fn read_note(path: &Path) -> Result<ContentState> {
    let html = fs::read_to_string(path)
        .with_context(|| format!("Failed to read note '{}'", path.display()))?;
    Ok(from_html(&html))
}

fn describe_block(block: &ContentBlock) -> String {
    let indent = "  ".repeat(usize::from(block.depth()));
    let marker = match block.kind() {
        BlockType::CheckableListItem if block.data().is_checked() => "[x] ",
        BlockType::CheckableListItem => "[ ] ",
        _ => "",
    };
    let styles: Vec<String> = block
        .inline_style_ranges()
        .iter()
        .map(|range| format!("{}@{}+{}", range.style.as_str(), range.offset, range.length))
        .collect();
    let styles = if styles.is_empty() {
        String::new()
    } else {
        format!("  ({})", styles.join(", "))
    };
    format!(
        "{indent}{}: {marker}{}{styles}",
        block.kind().as_str(),
        block.text().replace('\n', "\\n")
    )
}

fn print_blocks(content: &ContentState) {
    for block in content.blocks() {
        println!("{}", describe_block(block));
    }
    for (key, entity) in content.entities() {
        if let Some(url) = entity.url() {
            println!("link {key:?}: {url}");
        }
    }
}

fn spellcheck(config: EditorConfig, toggle: bool) -> Result<()> {
    let preferences_path = config.resolved_preferences_path();
    let preferences = FilePreferences::open(&preferences_path)
        .with_context(|| format!("Failed to open preferences '{}'", preferences_path.display()))?;
    let mut session = Session::new(config, Box::new(preferences), LoggingHost);
    if toggle {
        session.toggle_spellcheck();
    }
    println!(
        "spellcheck: {}",
        if session.spellcheck() { "on" } else { "off" }
    );
    Ok(())
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} normalize <note.html>");
    eprintln!("       {program} blocks <note.html>");
    eprintln!("       {program} spellcheck [toggle]");
    process::exit(1);
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pragma-editor-cli");

    let config = match EditorConfig::load() {
        Ok(Some(config)) => config,
        Ok(None) => EditorConfig::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", EditorConfig::config_path().display());
            process::exit(1);
        }
    };

    match args.get(1..).unwrap_or_default() {
        [command, path] if command == "normalize" => {
            let content = read_note(Path::new(path))?;
            println!("{}", to_html(&content));
        }
        [command, path] if command == "blocks" => {
            let content = read_note(Path::new(path))?;
            print_blocks(&content);
        }
        [command] if command == "spellcheck" => spellcheck(config, false)?,
        [command, action] if command == "spellcheck" && action == "toggle" => {
            spellcheck(config, true)?
        }
        _ => usage(program),
    }

    Ok(())
}
