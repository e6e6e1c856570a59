use anyhow::{Context, Result};
use clap::Parser;
use study_analyzer::app::Analyzer;
use study_analyzer::models::{AnalysisResult, Config};
use study_analyzer::session::StudySession;
use study_analyzer::upload;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "study-analyzer")]
#[command(about = "Summarize study material and generate multiple-choice questions")]
struct CliArgs {
    /// Document text to analyze.
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read document text from a file, or `-` for stdin.
    #[arg(long, value_name = "PATH")]
    text_file: Option<PathBuf>,

    /// Image to include (PNG, JPEG, GIF, WebP, HEIC or HEIF). May be repeated.
    #[arg(long = "image", value_name = "PATH")]
    images: Vec<PathBuf>,

    /// Number of extra question batches to request after the analysis.
    #[arg(long, default_value_t = 0)]
    more: u32,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    json: bool,
}

async fn read_text(args: &CliArgs) -> Result<String> {
    match (&args.text, &args.text_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read text from stdin")?;
            Ok(text)
        }
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

fn render_result(result: &AnalysisResult) -> String {
    let mut out = format!("SUMMARY\n\n{}\n\nQUESTIONS\n", result.summary);
    for question in &result.questions {
        out.push('\n');
        out.push_str(question);
        out.push('\n');
    }
    if !result.references.is_empty() {
        out.push_str("\nREFERENCES\n\n");
        for reference in &result.references {
            out.push_str(&format!("- {} <{}>\n", reference.title, reference.uri));
        }
    }
    out
}

/// Run the analysis, then up to `more` extra question rounds. A failed round
/// stops further rounds without discarding the analysis; its error is
/// returned alongside so the caller can still print what was gathered.
async fn analyze_with_rounds(
    session: &mut StudySession,
    more: u32,
) -> study_analyzer::Result<Option<study_analyzer::Error>> {
    session.analyze().await?;
    for round in 1..=more {
        match session.generate_more().await {
            Ok(added) => info!("Round {}: added {} questions", round, added),
            Err(e) => {
                error!("Round {} failed, keeping earlier questions: {}", round, e);
                return Ok(Some(e));
            }
        }
    }
    Ok(None)
}

fn format_output(result: &AnalysisResult, json: bool) -> Result<String> {
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(result)?))
    } else {
        Ok(render_result(result))
    }
}

async fn run(args: CliArgs, config: Config) -> Result<()> {
    let mut session = StudySession::new(Analyzer::from_config(&config));
    info!("Session {} using model {}", session.id(), config.model);

    session.set_text(read_text(&args).await?);
    for path in &args.images {
        session.add_image(upload::attachment_from_path(path).await?);
    }

    let round_error = analyze_with_rounds(&mut session, args.more).await?;

    let result = session.result().context("Analysis finished without a result")?;
    print!("{}", format_output(result, args.json)?);

    match round_error {
        Some(e) => Err(anyhow::Error::new(e).context("Generating more questions failed")),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match run(args, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_analyzer::ai::MockAnalysisClient;
    use study_analyzer::models::WebReference;
    use study_analyzer::Error;

    const ANALYSIS_RESPONSE: &str = "### SUMMARY ###
**Hydraulic Power**
### QUESTIONS ###
1. What do pumps convert?
   Answer: A
";

    fn session_with(mock: &MockAnalysisClient) -> StudySession {
        let mut session = StudySession::new(Analyzer::new(Box::new(mock.clone())));
        session.set_text("Pumps convert mechanical power.");
        session
    }

    #[test]
    fn test_cli_parses_repeated_images() {
        let args = CliArgs::parse_from([
            "study-analyzer",
            "--text",
            "notes",
            "--image",
            "a.png",
            "--image",
            "b.jpg",
            "--more",
            "2",
        ]);
        assert_eq!(args.text.as_deref(), Some("notes"));
        assert_eq!(args.images.len(), 2);
        assert_eq!(args.more, 2);
        assert!(!args.json);
    }

    #[test]
    fn test_cli_rejects_text_and_text_file() {
        let err = CliArgs::try_parse_from([
            "study-analyzer",
            "--text",
            "a",
            "--text-file",
            "b.txt",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_render_result() {
        let result = AnalysisResult {
            summary: "**Topic**".to_string(),
            questions: vec!["1. One?".to_string(), "2. Two?".to_string()],
            references: vec![WebReference {
                uri: "https://a.example".to_string(),
                title: "A".to_string(),
            }],
        };
        let rendered = render_result(&result);
        assert!(rendered.starts_with("SUMMARY\n\n**Topic**"));
        assert!(rendered.contains("\n1. One?\n\n2. Two?\n"));
        assert!(rendered.ends_with("- A <https://a.example>\n"));
    }

    #[test]
    fn test_render_result_without_references() {
        let rendered = render_result(&AnalysisResult::default());
        assert!(!rendered.contains("REFERENCES"));
    }

    #[tokio::test]
    async fn test_failed_round_keeps_analysis_output() {
        let mock = MockAnalysisClient::new()
            .with_text_response(ANALYSIS_RESPONSE)
            .with_failure("quota exceeded");
        let mut session = session_with(&mock);

        let round_error = analyze_with_rounds(&mut session, 3).await.unwrap();
        assert!(matches!(round_error, Some(Error::AiProvider(_))));
        // No rounds are requested after the first failure.
        assert_eq!(mock.get_call_count(), 2);

        let result = session.result().unwrap();
        let text = format_output(result, false).unwrap();
        assert!(text.contains("**Hydraulic Power**"));
        assert!(text.contains("1. What do pumps convert?"));

        let json = format_output(result, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["questions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_analysis_is_an_error() {
        let mock = MockAnalysisClient::new().with_failure("unavailable");
        let mut session = session_with(&mock);

        let err = analyze_with_rounds(&mut session, 2).await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
        assert!(session.result().is_none());
        assert_eq!(mock.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_all_rounds_run_when_they_succeed() {
        let mock = MockAnalysisClient::new()
            .with_text_response(ANALYSIS_RESPONSE)
            .with_text_response("1. Another?\n   Answer: B\n");
        let mut session = session_with(&mock);

        let round_error = analyze_with_rounds(&mut session, 1).await.unwrap();
        assert!(round_error.is_none());
        assert_eq!(session.result().unwrap().questions.len(), 2);
    }
}
