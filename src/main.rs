use clap::Parser;
use cormark::{markdown_to_html, markdown_to_latex, Extensions, Options, RenderFlags};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

/// A CommonMark → HTML/LaTeX renderer.
#[derive(Parser)]
#[command(name = "cormark", version, about)]
struct Cli {
    /// Input files; stdin is read when none are given.
    files: Vec<PathBuf>,

    /// Emit LaTeX instead of HTML.
    #[arg(long)]
    latex: bool,

    /// Treat every soft line break as a hard break.
    #[arg(long)]
    hardbreaks: bool,

    /// Use curly quotes.
    #[arg(long)]
    smart: bool,

    /// Enable `~~strikethrough~~`.
    #[arg(long)]
    strikethrough: bool,

    /// Link bare URLs, www. domains and email addresses.
    #[arg(long)]
    autolink: bool,

    /// Disallow emphasis inside words.
    #[arg(long)]
    no_intra_emphasis: bool,

    /// Expand tabs to 8-column stops.
    #[arg(long)]
    tab_size_eight: bool,

    /// Suppress raw HTML in the output.
    #[arg(long)]
    skip_html: bool,

    /// Only link to http, https, ftp, mailto and relative destinations.
    #[arg(long)]
    safe: bool,

    /// Add rel="nofollow" to links.
    #[arg(long)]
    nofollow: bool,

    /// Add target="_blank" to absolute links.
    #[arg(long)]
    target_blank: bool,

    /// Wrap the output in a complete HTML page.
    #[arg(long)]
    complete_page: bool,

    /// Use an XHTML doctype for --complete-page.
    #[arg(long)]
    xhtml: bool,

    /// Document title for --complete-page.
    #[arg(long, default_value = "")]
    title: String,

    /// Stylesheet URL for --complete-page.
    #[arg(long, default_value = "")]
    css: String,
}

fn run(cli: &Cli) -> io::Result<()> {
    let mut options = Options {
        title: cli.title.clone(),
        css: cli.css.clone(),
        ..Options::default()
    };

    let ext_flags = [
        (cli.hardbreaks, Extensions::HARD_LINE_BREAK),
        (cli.strikethrough, Extensions::STRIKETHROUGH),
        (cli.autolink, Extensions::AUTOLINK),
        (cli.no_intra_emphasis, Extensions::NO_INTRA_EMPHASIS),
        (cli.tab_size_eight, Extensions::TAB_SIZE_EIGHT),
    ];
    for (enabled, flag) in ext_flags {
        if enabled {
            options.extensions |= flag;
        }
    }

    let render_flags = [
        (cli.smart, RenderFlags::USE_SMARTYPANTS),
        (cli.skip_html, RenderFlags::SKIP_HTML),
        (cli.safe, RenderFlags::SAFE_LINK),
        (cli.nofollow, RenderFlags::NOFOLLOW_LINKS),
        (cli.target_blank, RenderFlags::HREF_TARGET_BLANK),
        (cli.complete_page, RenderFlags::COMPLETE_PAGE),
        (cli.xhtml, RenderFlags::USE_XHTML),
    ];
    for (enabled, flag) in render_flags {
        if enabled {
            options.render |= flag;
        }
    }

    let mut input = String::new();
    if cli.files.is_empty() {
        io::stdin().read_to_string(&mut input)?;
    } else {
        for file in &cli.files {
            input.push_str(&std::fs::read_to_string(file)?);
        }
    }

    let output = if cli.latex {
        markdown_to_latex(&input, &options)
    } else {
        markdown_to_html(&input, &options)
    };

    io::stdout().write_all(output.as_bytes())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("cormark: {}", e);
        process::exit(1);
    }
}
