use std::path::PathBuf;
use std::process::ExitCode;

use blog_widgets::app::infrastructure::logging::init_tracing;
use blog_widgets::app::{AppError, Message, Page, PageState, Result, WidgetSettings};

const USAGE: &str = "usage: blog-widgets [--settings <path>] <page.json> [input:<id>=<text> | submit:<form-id>]...";

struct Args {
    settings: Option<PathBuf>,
    page: PathBuf,
    events: Vec<Message>,
}

fn parse_event(raw: &str) -> Result<Message> {
    if let Some(rest) = raw.strip_prefix("input:") {
        let (id, text) = rest
            .split_once('=')
            .ok_or_else(|| AppError::Usage(format!("expected input:<id>=<text>, got '{}'", raw)))?;
        // Allow "\n" on the command line for multi-line markdown
        return Ok(Message::EditorInput {
            id: id.to_string(),
            text: text.replace("\\n", "\n"),
        });
    }
    if let Some(form_id) = raw.strip_prefix("submit:") {
        return Ok(Message::FormSubmit {
            form_id: form_id.to_string(),
        });
    }
    Err(AppError::Usage(format!("unknown event '{}'", raw)))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut settings = None;
    let mut page = None;
    let mut events = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--settings" {
            let path = args
                .next()
                .ok_or_else(|| AppError::Usage("--settings needs a path".to_string()))?;
            settings = Some(PathBuf::from(path));
        } else if page.is_none() {
            page = Some(PathBuf::from(arg));
        } else {
            events.push(parse_event(&arg)?);
        }
    }

    let page = page.ok_or_else(|| AppError::Usage("missing page snapshot".to_string()))?;
    Ok(Args { settings, page, events })
}

fn run(args: Args) -> Result<String> {
    let (settings, settings_error) = match &args.settings {
        Some(path) => (WidgetSettings::load_from(path)?, None),
        None => WidgetSettings::load_or_default(&WidgetSettings::get_config_path()),
    };
    // The filter lives in the settings, so their errors are reported once it is up
    init_tracing(&settings.log_filter);
    if let Some(e) = settings_error {
        tracing::warn!(error = %e, "failed to parse settings, using defaults");
    }

    let page = Page::load(&args.page)?;
    let mut state = PageState::new(page, settings);
    state.ready()?;

    for event in args.events {
        let result = state.handle(event);
        tracing::debug!(?result, "event handled");
    }
    state.wait_for_deliveries();

    state.page.to_json_pretty()
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("blog-widgets: {}", e);
            ExitCode::FAILURE
        }
    }
}
