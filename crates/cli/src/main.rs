use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vtj_types::{NonEmptyText, PersonalIdentityCode};
use vtjkysely::request::{
    Credentials, HenkiloTunnusKyselyReqBodyTiedot, KiinteistoTunnusKyselyReqBodyTiedot,
    KyselyReqBody, RakennusTunnusKyselyReqBodyTiedot, TuotteenSkeemaReqBodyTiedot,
};
use vtjkysely::{
    BodyElement, Codec, CodecConfig, Decoded, Strictness, VtjError, VtjHenkiloVastaussanoma,
};

/// Looks up a configuration value by environment variable name.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

#[derive(Parser)]
#[command(name = "vtj")]
#[command(about = "VTJ population registry query documents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a SOAP body element or a person document and print it
    Inspect {
        /// XML document to read
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Reject documents that violate their content model
        #[arg(long)]
        strict: bool,
    },
    /// List schema violations in a document; fails if there are any
    Validate {
        /// XML document to read
        file: PathBuf,
    },
    /// Render a request body using credentials from the environment
    Request {
        #[command(subcommand)]
        kind: RequestKind,
    },
}

#[derive(Subcommand)]
enum RequestKind {
    /// Person lookup by identity code
    Henkilo {
        /// Personal identity code (henkilötunnus)
        #[arg(long)]
        hetu: String,
    },
    /// Building lookup by building identifier
    Rakennus {
        #[arg(long)]
        tunnus: String,
    },
    /// Property lookup by property identifier
    Kiinteisto {
        #[arg(long)]
        tunnus: String,
    },
    /// Product schema request
    Skeema {
        /// Schema kind
        #[arg(long)]
        laji: i32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

/// A decoded input document.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Document {
    Body(BodyElement),
    Person(VtjHenkiloVastaussanoma),
}

/// Main entry point for the `vtj` command line tool.
///
/// # Environment Variables
/// - `VTJ_STRICT`: reject documents with schema violations (default: lax)
/// - `VTJ_XML_INDENT`: indentation width of rendered XML (default: none)
/// - `VTJ_SOSO_NIMI`, `VTJ_KAYTTAJATUNNUS`, `VTJ_SALASANA`: request credentials
/// - `VTJ_LOPPUKAYTTAJA`: end user written into requests (optional)
/// - `RUST_LOG`: log filter, on top of the default `vtj=info`
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("vtj=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let env = |key: &str| std::env::var(key).ok();
    let config = codec_config(&env)?;

    match cli.command {
        Some(Commands::Inspect {
            file,
            format,
            strict,
        }) => {
            let config = if strict {
                config.with_strictness(Strictness::Strict)
            } else {
                config
            };
            let decoded = read_document(&Codec::new(config), &file)?;
            for violation in &decoded.violations {
                tracing::warn!(%violation, "schema violation");
            }
            println!("{}", render(&decoded.value, format)?);
        }
        Some(Commands::Validate { file }) => {
            let codec = Codec::new(config.with_strictness(Strictness::Lax));
            let decoded = read_document(&codec, &file)?;
            if !decoded.violations.is_empty() {
                for violation in &decoded.violations {
                    println!("{violation}");
                }
                anyhow::bail!(
                    "{} schema violation(s) in {}",
                    decoded.violations.len(),
                    file.display()
                );
            }
            tracing::info!(file = %file.display(), "document is valid");
        }
        Some(Commands::Request { kind }) => {
            let body = request_body(kind, &env)?;
            let xml = Codec::new(config).encode_body(&body)?;
            println!("{xml}");
        }
        None => {
            println!("Use 'vtj --help' for commands");
        }
    }

    Ok(())
}

fn codec_config(lookup: Lookup<'_>) -> anyhow::Result<CodecConfig> {
    let strict = lookup("VTJ_STRICT");
    let indent = lookup("VTJ_XML_INDENT");
    CodecConfig::from_values(strict.as_deref(), indent.as_deref())
        .context("invalid codec configuration")
}

/// Decode `path` as a SOAP body element, or as a bare person document if its root is not one.
fn read_document(codec: &Codec, path: &Path) -> anyhow::Result<Decoded<Document>> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    match codec.decode_body(&xml) {
        Ok(decoded) => Ok(Decoded {
            value: Document::Body(decoded.value),
            violations: decoded.violations,
        }),
        Err(VtjError::UnexpectedRoot { .. }) => {
            let decoded = codec
                .decode_with_report::<VtjHenkiloVastaussanoma>(&xml)
                .with_context(|| format!("failed to decode {}", path.display()))?;
            Ok(Decoded {
                value: Document::Person(decoded.value),
                violations: decoded.violations,
            })
        }
        Err(e) => Err(e).with_context(|| format!("failed to decode {}", path.display())),
    }
}

fn render(document: &Document, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(document)?,
        Format::Yaml => serde_yaml::to_string(document)?,
    })
}

fn required_text(lookup: Lookup<'_>, key: &str) -> anyhow::Result<NonEmptyText> {
    let value = lookup(key).with_context(|| format!("{key} is not set"))?;
    NonEmptyText::new(value).with_context(|| format!("{key} must not be empty"))
}

fn credentials(lookup: Lookup<'_>) -> anyhow::Result<Credentials> {
    let credentials = Credentials::new(
        &required_text(lookup, "VTJ_SOSO_NIMI")?,
        &required_text(lookup, "VTJ_KAYTTAJATUNNUS")?,
        &required_text(lookup, "VTJ_SALASANA")?,
    );
    match lookup("VTJ_LOPPUKAYTTAJA").filter(|v| !v.trim().is_empty()) {
        Some(end_user) => Ok(credentials.with_end_user(&NonEmptyText::new(end_user)?)),
        None => Ok(credentials),
    }
}

fn request_body(kind: RequestKind, lookup: Lookup<'_>) -> anyhow::Result<BodyElement> {
    let body = match kind {
        RequestKind::Henkilo { hetu } => {
            let hetu = PersonalIdentityCode::parse(&hetu).context("invalid --hetu")?;
            let tiedot = HenkiloTunnusKyselyReqBodyTiedot::new(credentials(lookup)?, &hetu);
            BodyElement::HenkilonTunnusKysely(KyselyReqBody::new(tiedot))
        }
        RequestKind::Rakennus { tunnus } => {
            let tunnus = NonEmptyText::new(tunnus).context("invalid --tunnus")?;
            let tiedot = RakennusTunnusKyselyReqBodyTiedot::new(credentials(lookup)?, &tunnus);
            BodyElement::RakennuksenTunnusKysely(KyselyReqBody::new(tiedot))
        }
        RequestKind::Kiinteisto { tunnus } => {
            let tunnus = NonEmptyText::new(tunnus).context("invalid --tunnus")?;
            let tiedot = KiinteistoTunnusKyselyReqBodyTiedot::new(credentials(lookup)?, &tunnus);
            BodyElement::KiinteistonTunnusKysely(KyselyReqBody::new(tiedot))
        }
        RequestKind::Skeema { laji } => {
            let so_so_nimi = required_text(lookup, "VTJ_SOSO_NIMI")?;
            let tiedot = TuotteenSkeemaReqBodyTiedot::new(&so_so_nimi, laji);
            BodyElement::HaeTuotteenSkeema(KyselyReqBody::new(tiedot))
        }
    };
    tracing::info!(element = %body.name(), "rendering request body");
    Ok(body)
}
