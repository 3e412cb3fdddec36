use anyhow::Result;
use clap::Parser;
use tracing::info;
use voice_capture::{
    Config, RecognizerEvent, ScriptedFactory, ScriptedRecognizer, Segment, SegmentBatch,
    VoiceCaptureSession,
};

/// Dictation session demo driving a scripted recognizer
///
/// Plays the given fragments through a capture session and prints the
/// partial and final emissions. End a fragment with a done word ("send",
/// "over", "done") to see immediate submission; otherwise the silence
/// timeout finalizes the utterance.
#[derive(Debug, Parser)]
#[command(name = "voice-capture", version)]
struct Cli {
    /// Config file name (without extension), e.g. config/voice-capture
    #[arg(long)]
    config: Option<String>,

    /// Final speech fragments to play back, in order
    #[arg(long = "fragment", required = true)]
    fragments: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    info!("voice-capture v0.1.0");
    info!(
        "locale={} silence_timeout_ms={} done_words={:?}",
        cfg.capture.locale, cfg.capture.silence_timeout_ms, cfg.capture.done_words
    );

    // Each fragment arrives as an interim preview followed by the committed
    // text, the way a continuous engine revises its current segment.
    let mut events = Vec::new();
    let mut resume_index = 0;
    for fragment in &cli.fragments {
        let text = format!("{} ", fragment.trim());
        events.push(RecognizerEvent::Result(SegmentBatch::new(
            resume_index,
            vec![Segment::interim(text.clone())],
        )));
        events.push(RecognizerEvent::Result(SegmentBatch::new(
            resume_index,
            vec![Segment::final_text(text)],
        )));
        resume_index += 1;
    }

    let factory = ScriptedFactory::new().queue(ScriptedRecognizer::new(events));
    let mut session = VoiceCaptureSession::with_config(Box::new(factory), cfg.capture);

    session.on_partial(|text| println!("partial: {}", text));
    session.on_result(|text| println!("final:   {}", text));
    session.on_state_change(|listening| {
        info!("listening: {}", listening);
    });

    session.start();
    session.run_to_idle().await;

    println!("{}", serde_json::to_string_pretty(&session.stats())?);

    Ok(())
}
