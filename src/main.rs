use clap::{Parser, Subcommand};
use folio::registry::{ProjectRegistry, filter_by_skills};
use folio::scaffold::{self, NewProject};
use folio::scan::Manifest;
use folio::types::{Environment, ProjectType};
use folio::{config, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for engineer + designer portfolios")]
#[command(long_about = "\
Static site generator for engineer + designer portfolios

Each project is a folder with an index.mdx: YAML frontmatter describes the
project, the markdown body is the case study.

Content structure:

  content/
  ├── config.toml                  # Site, profile and color config (optional)
  ├── resume.pdf                   # Shown on /resume/
  └── projects/
      ├── checkout-redesign/
      │   ├── index.mdx            # Frontmatter + case study
      │   ├── cover.jpg            # Referenced as cover.filename
      │   └── flow-01.png          # Referenced from gallery
      └── _notes/                  # Leading _ or . = ignored

Ordering: featured first, then `order` ascending, then newest date.
Drafts are only rendered with --env development.

Run 'folio new <slug>' to scaffold a project, and
'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    /// Override site.environment from config.toml
    #[arg(long, value_enum, global = true)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the final HTML site from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// List visible projects in display order
    List {
        /// Only projects using this skill (repeat to require several)
        #[arg(long = "skill")]
        skills: Vec<String>,
        /// Only projects of this type
        #[arg(long = "type", value_enum)]
        project_type: Option<ProjectType>,
    },
    /// Show one project's frontmatter and output page
    Show {
        /// Project slug
        slug: String,
    },
    /// Show skill usage counts across visible projects
    Skills {
        /// Only count projects of this type
        #[arg(long = "type", value_enum)]
        project_type: Option<ProjectType>,
    },
    /// Scaffold a new draft project
    New {
        /// Folder name and URL slug (lowercase, digits, dashes)
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long = "type", value_enum)]
        project_type: ProjectType,
        #[arg(long)]
        tagline: Option<String>,
        #[arg(long)]
        featured: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "folio=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Scan => {
            let manifest = scan_with_env(&cli.source, cli.env)?;
            write_manifest(&cli.temp_dir, &manifest)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let content = std::fs::read_to_string(&manifest_path)?;
            let mut manifest: Manifest = serde_json::from_str(&content)?;
            if let Some(env) = cli.env {
                manifest.config.site.environment = env;
            }
            init_thread_pool(&manifest.config.processing);
            let summary = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&summary);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan_with_env(&cli.source, cli.env)?;
            write_manifest(&cli.temp_dir, &manifest)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let summary = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan_with_env(&cli.source, cli.env)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::List {
            skills,
            project_type,
        } => {
            let registry = load_registry(&cli.source, cli.env)?;
            let candidates = match project_type {
                Some(t) => registry.by_type(*t),
                None => registry.list_visible(),
            };
            output::print_project_list(&filter_by_skills(&candidates, skills.as_slice()));
        }
        Command::Show { slug } => {
            let registry = load_registry(&cli.source, cli.env)?;
            let project = registry
                .get_by_slug(slug)
                .ok_or_else(|| format!("no project with slug '{slug}'"))?;
            let visible = registry.list_visible().iter().any(|p| p.slug == *slug);
            output::print_project_detail(project, visible);
        }
        Command::Skills { project_type } => {
            let registry = load_registry(&cli.source, cli.env)?;
            output::print_skills(&registry.all_skills(*project_type));
        }
        Command::New {
            slug,
            title,
            project_type,
            tagline,
            featured,
        } => {
            let new = NewProject {
                slug: slug.clone(),
                title: title.clone(),
                project_type: *project_type,
                tagline: tagline.clone(),
                featured: *featured,
            };
            let today = chrono::Local::now().date_naive();
            let path = scaffold::create_project(&cli.source, &new, today)?;
            println!("Created {}", path.display());
            println!("Next steps:");
            println!("  1. Add cover.jpg next to index.mdx");
            println!("  2. Write the case study sections");
            println!("  3. Set draft: false when ready to publish");
        }
    }

    Ok(())
}

/// Scan, then apply the `--env` override to the loaded config.
fn scan_with_env(source: &Path, env: Option<Environment>) -> Result<Manifest, scan::ScanError> {
    let mut manifest = scan::scan(source)?;
    if let Some(env) = env {
        manifest.config.site.environment = env;
    }
    Ok(manifest)
}

fn load_registry(
    source: &Path,
    env: Option<Environment>,
) -> Result<ProjectRegistry, scan::ScanError> {
    let manifest = scan_with_env(source, env)?;
    Ok(ProjectRegistry::new(
        manifest.projects,
        manifest.config.site.environment,
    ))
}

fn write_manifest(temp_dir: &Path, manifest: &Manifest) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can lower the count, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
