// Command-line interface for blockpress
//
// Renders documents from an on-disk export of a block store: a directory with pages.json and
// blocks/<parent-id>.json files (see blockpress::source::export).
//
// Usage:
//  blockpress render <export> <slug> [--to html|fragment|json|outline] [-o <file>]
//  blockpress list <export>
//  blockpress build <export> --out <dir>
//
// Global options:
//  --config <path>       Layer a blockpress.toml over the defaults (./blockpress.toml is picked up when present)
//  --asset-dir <dir>     Where hosted images are mirrored (overrides assets.directory)
//  --mirror-root <dir>   Serve http(s) URLs from <dir>/<host>/<path> instead of failing
//
// file:// URLs in an export are only read when they point inside the export directory.
//  -v, -vv               Log at info / debug level (RUST_LOG is honoured)
//
// Exit codes: 0 on success, 1 on any error, 2 when the requested document does not exist.

use blockpress::document::page_metadata;
use blockpress::formats::tree::outline;
use blockpress::model::PropertyNames;
use blockpress::{
    AssetMirror, Document, Error, ExportSource, Fetch, HtmlRenderer, LocalFetcher,
    MirrorOptions, PageFilter, PageResolver, PageSort, Publisher, RenderContext, RenderOptions,
    TreeRenderer,
};
use blockpress_config::{BlockpressConfig, Loader};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{info, warn, LevelFilter};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const OUTPUT_FORMATS: [&str; 4] = ["html", "fragment", "json", "outline"];

fn build_cli() -> Command {
    Command::new("blockpress")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render block-tree document exports to HTML or JSON")
        .long_about(
            "blockpress renders documents exported from a block store.\n\n\
            An export directory holds pages.json (the page records) and\n\
            blocks/<parent-id>.json (the children of each page or block).\n\n\
            Commands:\n  \
            - render: Render one published document\n  \
            - list:   List published documents, newest first\n  \
            - build:  Render every published document into a directory\n\n\
            Examples:\n  \
            blockpress render export hello                 # Full HTML page to stdout\n  \
            blockpress render export hello --to json       # Structured tree as JSON\n  \
            blockpress build export --out site             # One HTML file per document",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a blockpress.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("asset-dir")
                .long("asset-dir")
                .value_name("DIR")
                .help("Directory hosted images are mirrored into")
                .value_hint(ValueHint::DirPath)
                .global(true),
        )
        .arg(
            Arg::new("mirror-root")
                .long("mirror-root")
                .value_name("DIR")
                .help("Serve remote URLs from a local mirror laid out as <host>/<path>")
                .value_hint(ValueHint::DirPath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log output (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render one published document")
                .arg(export_arg())
                .arg(
                    Arg::new("slug")
                        .help("Slug of the document to render")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Output format")
                        .long_help(
                            "Output format.\n\n\
                            html:     complete HTML page with embedded CSS (default)\n\
                            fragment: the rendered body only\n\
                            json:     document metadata and structured body\n\
                            outline:  indented outline of the structured body",
                        )
                        .default_value("html")
                        .value_parser(clap::builder::PossibleValuesParser::new(OUTPUT_FORMATS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List published documents, newest first")
                .arg(export_arg()),
        )
        .subcommand(
            Command::new("build")
                .about("Render every published document into a directory")
                .long_about(
                    "Render every published document to <out>/<slug>.html and write\n\
                    <out>/index.json with the metadata of each document.",
                )
                .arg(export_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("DIR")
                        .help("Output directory")
                        .required(true)
                        .value_hint(ValueHint::DirPath),
                ),
        )
}

fn export_arg() -> Arg {
    Arg::new("export")
        .help("Path to the export directory")
        .required(true)
        .index(1)
        .value_hint(ValueHint::DirPath)
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            let runtime = Runtime::new(&config, &matches, sub_matches);
            let slug = required(sub_matches, "slug");
            let to = sub_matches
                .get_one::<String>("to")
                .map(|s| s.as_str())
                .unwrap_or("html");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_render_command(&runtime, slug, to, output);
        }
        Some(("list", sub_matches)) => {
            let runtime = Runtime::new(&config, &matches, sub_matches);
            handle_list_command(&runtime);
        }
        Some(("build", sub_matches)) => {
            let runtime = Runtime::new(&config, &matches, sub_matches);
            handle_build_command(&runtime, Path::new(required(sub_matches, "out")));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    // clap enforces `required(true)`; an absent value can only be a usage error.
    match matches.get_one::<String>(name) {
        Some(value) => value,
        None => {
            eprintln!("Missing required argument '{name}'");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_cli_config(explicit_path: Option<&str>) -> BlockpressConfig {
    let loader = Loader::new().with_optional_file("blockpress.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Collaborators shared by every command.
struct Runtime {
    export: ExportSource,
    fetcher: Arc<dyn Fetch>,
    mirror: AssetMirror,
    render: RenderOptions,
    properties: PropertyNames,
}

impl Runtime {
    fn new(config: &BlockpressConfig, global: &ArgMatches, command: &ArgMatches) -> Self {
        let export_root = required(command, "export");
        let export = ExportSource::new(export_root).with_page_size(config.source.page_size);

        let mut fetcher = LocalFetcher::new().with_file_root(export_root);
        if let Some(root) = global.get_one::<String>("mirror-root") {
            fetcher = fetcher.with_mirror_root(root);
        }
        let fetcher: Arc<dyn Fetch> = Arc::new(fetcher);

        let mut mirror_options = MirrorOptions::from(&config.assets);
        if let Some(dir) = global.get_one::<String>("asset-dir") {
            mirror_options.directory = PathBuf::from(dir);
        }
        let mirror = AssetMirror::new(mirror_options, Arc::clone(&fetcher));

        Self {
            export,
            fetcher,
            mirror,
            render: RenderOptions::from(&config.render),
            properties: PropertyNames::from(&config.properties),
        }
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::new(self.render.clone())
            .with_assets(&self.mirror)
            .with_fetcher(self.fetcher.as_ref())
    }
}

/// Report a library error and exit; a missing document exits with 2.
fn fail(err: Error) -> ! {
    eprintln!("Error: {err}");
    let code = match err {
        Error::NotFound(_) => 2,
        _ => 1,
    };
    std::process::exit(code);
}

fn handle_render_command(runtime: &Runtime, slug: &str, to: &str, output: Option<&str>) {
    let context = runtime.context();
    let rendered = match to {
        "html" | "fragment" => {
            let publisher = Publisher::new(&runtime.export, &runtime.export, &HtmlRenderer, &context)
                .with_properties(runtime.properties.clone());
            let document = publisher.document(slug).unwrap_or_else(|e| fail(e));
            let html = if to == "html" {
                HtmlRenderer.to_html_page(&document)
            } else {
                HtmlRenderer.to_html(&document.body)
            };
            html.unwrap_or_else(|e| fail(e))
        }
        _ => {
            let publisher = Publisher::new(&runtime.export, &runtime.export, &TreeRenderer, &context)
                .with_properties(runtime.properties.clone());
            let document = publisher.document(slug).unwrap_or_else(|e| fail(e));
            if to == "json" {
                serde_json::to_string_pretty(&document).unwrap_or_else(|e| {
                    eprintln!("Serialization error: {e}");
                    std::process::exit(1);
                }) + "\n"
            } else {
                outline(&document.body)
            }
        }
    };

    match output {
        Some(path) => {
            fs::write(path, rendered).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
            info!("Wrote {path}");
        }
        None => print!("{rendered}"),
    }
}

fn handle_list_command(runtime: &Runtime) {
    let filter = PageFilter::published(&runtime.properties).sorted(PageSort::CreatedDescending);
    let pages = runtime
        .export
        .query_pages(&filter)
        .unwrap_or_else(|e| fail(e.into()));
    for page in pages {
        match page_metadata(&page, &runtime.properties) {
            Ok(metadata) => println!(
                "{}\t{}\t{}",
                metadata.created_at, metadata.slug, metadata.title
            ),
            Err(err) => warn!("Skipping page {}: {err}", page.id),
        }
    }
}

fn handle_build_command(runtime: &Runtime, out: &Path) {
    let context = runtime.context();
    let publisher = Publisher::new(&runtime.export, &runtime.export, &HtmlRenderer, &context)
        .with_properties(runtime.properties.clone());
    let documents = publisher
        .published_documents()
        .unwrap_or_else(|e| fail(e));

    let mut seen = HashSet::new();
    for document in &documents {
        let slug = &document.metadata.slug;
        if let Err(reason) = check_slug(slug) {
            eprintln!("Error: cannot write document {}: slug '{slug}' {reason}", document.id);
            std::process::exit(1);
        }
        if !seen.insert(slug.as_str()) {
            eprintln!("Error: more than one published document has the slug '{slug}'");
            std::process::exit(1);
        }
    }

    fs::create_dir_all(out).unwrap_or_else(|e| {
        eprintln!("Error creating directory '{}': {e}", out.display());
        std::process::exit(1);
    });
    for document in &documents {
        let html = HtmlRenderer.to_html_page(document).unwrap_or_else(|e| fail(e));
        write_output(&out.join(format!("{}.html", document.metadata.slug)), html);
    }

    let index: Vec<_> = documents.iter().map(document_entry).collect();
    let index_json = serde_json::to_string_pretty(&index).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    write_output(&out.join("index.json"), index_json);
    println!("Rendered {} documents to {}", documents.len(), out.display());
}

/// Slugs become file names under the output directory.
fn check_slug(slug: &str) -> Result<(), &'static str> {
    if slug.is_empty() {
        return Err("is empty");
    }
    if slug == "." || slug == ".." || slug.contains(['/', '\\', '\0']) {
        return Err("is not a plain file name");
    }
    Ok(())
}

fn document_entry<N>(document: &Document<N>) -> serde_json::Value {
    serde_json::json!({
        "id": document.id,
        "slug": document.metadata.slug,
        "title": document.metadata.title,
        "createdAt": document.metadata.created_at,
        "path": format!("{}.html", document.metadata.slug),
    })
}

fn write_output(path: &Path, contents: String) {
    fs::write(path, contents).unwrap_or_else(|e| {
        eprintln!("Error writing file '{}': {e}", path.display());
        std::process::exit(1);
    });
    info!("Wrote {}", path.display());
}
