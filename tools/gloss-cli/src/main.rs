use anyhow::Context;
use clap::{Parser, Subcommand};
use gloss_annotate::ConllAnnotator;
use gloss_engine::{Translator, TranslatorConfig};
use gloss_lexicon::{compile, parse_json, CompiledLexicon, LexicalStore, MemoryLexicon};
use log::{info, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Rule-based English to sign gloss translation")]
struct Cli {
    /// Log rule selection and every dictionary decision
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validates a JSON dictionary and compiles it to the binary archive
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Translates every paragraph of an annotation file and prints JSON
    Translate {
        /// Parser output in CoNLL format
        #[arg(short, long, value_name = "FILE")]
        annotations: PathBuf,

        /// JSON dictionary, or a compiled archive from `compile`
        #[arg(short, long, value_name = "FILE")]
        dictionary: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Overrides the configured target language
        #[arg(short, long)]
        language: Option<String>,

        /// Writes to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match cli.command {
        Command::Compile { input, output } => compile_dictionary(&input, &output),
        Command::Translate {
            annotations,
            dictionary,
            config,
            language,
            output,
        } => {
            let mut settings = match config {
                Some(path) => {
                    let json = fs::read_to_string(&path)
                        .with_context(|| format!("reading config {:?}", path))?;
                    TranslatorConfig::from_json(&json).with_context(|| format!("parsing config {:?}", path))?
                }
                None => TranslatorConfig::default(),
            };
            if let Some(language) = language {
                settings = settings.with_language(language);
            }

            let input = fs::read_to_string(&annotations)
                .with_context(|| format!("reading annotations {:?}", annotations))?;
            let annotator = ConllAnnotator::parse(&input)?;

            let json = if is_json(&dictionary) {
                let store = MemoryLexicon::from_json(&fs::read_to_string(&dictionary)?)?;
                translate(annotator, store, settings)?
            } else {
                let store = CompiledLexicon::from_bytes(&fs::read(&dictionary)?)?;
                translate(annotator, store, settings)?
            };

            match output {
                Some(path) => fs::write(&path, json)?,
                None => println!("{}", json),
            }
            Ok(())
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

fn compile_dictionary(input: &Path, output: &Path) -> anyhow::Result<()> {
    println!("📖 Reading JSON from {:?}...", input);
    let lexicon = parse_json(&fs::read_to_string(input)?)?;

    println!(
        "⚙️  Compiling dictionary version {} with {} entries...",
        lexicon.version,
        lexicon.entries.len()
    );
    let bytes = compile(&lexicon)?;
    fs::write(output, &bytes)?;

    println!("✅ Success! Binary written to {:?}", output);
    Ok(())
}

fn translate<S: LexicalStore>(
    annotator: ConllAnnotator,
    store: S,
    config: TranslatorConfig,
) -> anyhow::Result<String> {
    let paragraphs = annotator.texts();
    info!(
        "Translating {} paragraph(s) into '{}'",
        paragraphs.len(),
        config.target_language
    );

    let translator = Translator::new(annotator, store, config);
    let translations = translator.translate(&paragraphs)?;
    Ok(serde_json::to_string_pretty(&translations)?)
}
