//! Quill command-line parser
//!
//! Parses HTML from a file, a string or stdin and prints what the parser built.
//!
//! - quill page.html                 # html5lib-style tree
//! - quill --format json page.html   # tree as JSON
//! - quill --fragment tr --html '<td>x'

use std::fs;
use std::io::{self, BufWriter, ErrorKind, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, ValueEnum};
use owo_colors::OwoColorize;
use quill_dom::{DomTree, NodeId, NodeType};
use quill_html::{
    ContextElement, InputStream, ParseError, ParserOption, ParserOptions, Token, TokenCollector,
    Tokenizer, parse_fragment, parse_with_options,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Quill: browser-accurate HTML parser
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree of a file
    quill index.html

    # Read from stdin and show parse errors
    cat index.html | quill --errors -

    # Parse a table row fragment
    quill --fragment tr --html '<td>a<td>b'

    # SVG fragment context
    quill --fragment 'svg svg' --html '<path/>'

    # Dump the token stream
    quill --format tokens --html '<p class=x>Hi'
"#)]
struct Cli {
    /// Path to an HTML file, or `-` for stdin
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parse as a fragment of this context element (`div`, `svg path`, `math:mi`)
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Print parse errors after the output
    #[arg(short, long)]
    errors: bool,

    /// Parse with the scripting flag disabled
    #[arg(long)]
    scripting_disabled: bool,

    /// Process stray table-section start tags in "in table body" instead of
    /// ignoring them
    #[arg(long)]
    disable_ignore_token_in_body_start_tag: bool,

    /// Close unknown elements written as `<x/>` immediately
    #[arg(long)]
    interpret_self_closing_anything_else: bool,

    /// Report control characters and noncharacters in the input
    #[arg(long)]
    check_input_stream: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// html5lib tree-construction format
    Tree,
    /// Nested JSON nodes
    Json,
    /// One line per token, no tree construction
    Tokens,
}

/// A parse error as printed in JSON output
#[derive(Serialize)]
struct ErrorRecord<'a> {
    code: &'static str,
    position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl<'a> From<&'a ParseError> for ErrorRecord<'a> {
    fn from(error: &'a ParseError) -> Self {
        Self {
            code: error.code.as_str(),
            position: error.position,
            detail: error.detail.as_deref(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = BufWriter::new(stdout.lock());
    match run(&cli, &mut out, color).and_then(|()| out.flush().map_err(Into::into)) {
        // `quill page.html | head` closes stdout early
        Err(err) if is_broken_pipe(&err) => {
            debug!("stdout closed");
            Ok(())
        }
        result => result,
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|err| err.kind() == ErrorKind::BrokenPipe)
}

fn run(cli: &Cli, out: &mut impl Write, color: bool) -> anyhow::Result<()> {
    let input = read_input(cli)?;
    let options = parser_options(cli);
    debug!(bytes = input.len(), ?options, "parsing input");

    if cli.format == Format::Tokens {
        let collector = collect_tokens(&input, options);
        print_tokens(out, &collector.tokens)?;
        if cli.errors {
            print_errors(out, &collector.errors, color)?;
        }
        return Ok(());
    }

    let (tree, errors) = match cli.fragment {
        Some(ref context) => {
            let context: ContextElement = context.parse()?;
            let fragment = parse_fragment(&context, &input, options)?;
            let errors = fragment.errors().to_vec();
            (fragment.into_tree(), errors)
        }
        None => {
            let document = parse_with_options(&input, options)?;
            let errors = document.errors().to_vec();
            (document.into_tree(), errors)
        }
    };

    match cli.format {
        Format::Json => {
            let output = tree_to_json(&tree, cli.errors.then_some(errors.as_slice()))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        Format::Tree | Format::Tokens => {
            out.write_all(quill_html::dump_tree(&tree).as_bytes())?;
            if cli.errors {
                print_errors(out, &errors, color)?;
            }
        }
    }
    Ok(())
}

/// The whole tree as JSON, with the parse errors when `errors` is given
fn tree_to_json(tree: &DomTree, errors: Option<&[ParseError]>) -> serde_json::Result<Value> {
    let mut output = json!({
        "quirksMode": tree.quirks_mode().to_string(),
        "children": children_to_json(tree, NodeId::ROOT),
    });
    if let Some(errors) = errors {
        let records: Vec<ErrorRecord<'_>> = errors.iter().map(ErrorRecord::from).collect();
        output["errors"] = serde_json::to_value(records)?;
    }
    Ok(output)
}

/// Install the `tracing` subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Load the HTML source from `--html`, a file or stdin
fn read_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref html) = cli.html {
        return Ok(html.clone());
    }
    match cli.path {
        Some(ref path) if path.as_os_str() == "-" => {
            let mut bytes = Vec::new();
            let _ = io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            Ok(quill_html::decode_utf8(&bytes).into_owned())
        }
        Some(ref path) => {
            let bytes =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok(quill_html::decode_utf8(&bytes).into_owned())
        }
        None => bail!("expected a FILE, `-` for stdin, or --html"),
    }
}

fn parser_options(cli: &Cli) -> ParserOptions {
    let flags: Vec<ParserOption> = [
        (cli.scripting_disabled, ParserOption::ScriptingDisabled),
        (
            cli.disable_ignore_token_in_body_start_tag,
            ParserOption::DisableIgnoreTokenInBodyStartTag,
        ),
        (
            cli.interpret_self_closing_anything_else,
            ParserOption::InterpretSelfClosingAnythingElse,
        ),
        (cli.check_input_stream, ParserOption::CheckInputStream),
    ]
    .into_iter()
    .filter_map(|(enabled, flag)| enabled.then_some(flag))
    .collect();
    ParserOptions::from_flags(&flags)
}

fn collect_tokens(input: &str, options: ParserOptions) -> TokenCollector {
    let stream = InputStream::new(input).with_codepoint_checks(options.check_input_stream);
    let mut tokenizer = Tokenizer::new(stream, TokenCollector::new());
    tokenizer.run();
    tokenizer.into_sink()
}

/// Print tokens one per line, with runs of characters merged
fn print_tokens(out: &mut impl Write, tokens: &[Token]) -> io::Result<()> {
    let mut text = String::new();
    for token in tokens {
        if let Token::Character { data } = token {
            text.push(*data);
            continue;
        }
        if !text.is_empty() {
            writeln!(out, "Character {text:?}")?;
            text.clear();
        }
        match token {
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => writeln!(
                out,
                "Doctype name={name:?} public={public_identifier:?} system={system_identifier:?} force_quirks={force_quirks}"
            )?,
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                let attrs: String = attributes
                    .iter()
                    .map(|attr| format!(" {}={:?}", attr.name, attr.value))
                    .collect();
                let slash = if *self_closing { " /" } else { "" };
                writeln!(out, "StartTag <{name}{attrs}{slash}>")?;
            }
            Token::EndTag { name, .. } => writeln!(out, "EndTag </{name}>")?,
            Token::Comment { data } => writeln!(out, "Comment {data:?}")?,
            Token::EndOfFile => writeln!(out, "EndOfFile")?,
            Token::Character { .. } => {}
        }
    }
    Ok(())
}

fn print_errors(out: &mut impl Write, errors: &[ParseError], color: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} parse error(s)", errors.len())?;
    for error in errors {
        let code = error.code.to_string();
        let detail = error
            .detail
            .as_deref()
            .map_or_else(String::new, |d| format!(" ({d})"));
        if color {
            writeln!(out, "  {}:{} {}{detail}", "error".red(), error.position, code.yellow())?;
        } else {
            writeln!(out, "  error:{} {code}{detail}", error.position)?;
        }
    }
    Ok(())
}

fn children_to_json(tree: &DomTree, id: NodeId) -> Vec<Value> {
    tree.children(id)
        .iter()
        .filter_map(|&child| node_to_json(tree, child))
        .collect()
}

fn node_to_json(tree: &DomTree, id: NodeId) -> Option<Value> {
    let node = tree.get(id)?;
    let value = match &node.node_type {
        NodeType::Document => json!({
            "type": "document",
            "children": children_to_json(tree, id),
        }),
        NodeType::DocumentType(doctype) => json!({
            "type": "doctype",
            "name": doctype.name,
            "publicId": doctype.public_id,
            "systemId": doctype.system_id,
        }),
        NodeType::Element(data) => {
            let attributes: Map<String, Value> = data
                .attrs
                .iter()
                .map(|attr| (attr.name.clone(), Value::String(attr.value.clone())))
                .collect();
            json!({
                "type": "element",
                "namespace": data.namespace.to_string(),
                "tagName": data.tag_name,
                "attributes": attributes,
                "children": children_to_json(tree, id),
            })
        }
        NodeType::Text(text) => json!({ "type": "text", "content": text }),
        NodeType::Comment(text) => json!({ "type": "comment", "content": text }),
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A writer whose reader has gone away
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let mut out = Vec::new();
        run(&cli, &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tree_output() {
        assert_eq!(
            render(&["quill", "--fragment", "tr", "--html", "<td>x"]),
            "| <td>\n|   \"x\"\n"
        );
    }

    #[test]
    fn test_json_quirks_mode_is_kebab_case() {
        let output = render(&[
            "quill",
            "--format",
            "json",
            "--html",
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN">"#,
        ]);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["quirksMode"], "limited-quirks");
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn test_json_errors_are_included_on_request() {
        let output = render(&["quill", "-f", "json", "-e", "--html", "<p>"]);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["quirksMode"], "quirks");
        assert_eq!(value["errors"][0]["code"], "missing-doctype");
    }

    #[test]
    fn test_token_output_merges_characters() {
        assert_eq!(
            render(&["quill", "-f", "tokens", "--html", "<b>hi</b>"]),
            "StartTag <b>\nCharacter \"hi\"\nEndTag </b>\nEndOfFile\n"
        );
    }

    #[test]
    fn test_closed_stdout_is_not_an_error() {
        for format in ["tree", "json", "tokens"] {
            let cli = Cli::try_parse_from(["quill", "-f", format, "--html", "<p>x"]).unwrap();
            let err = run(&cli, &mut ClosedPipe, false).unwrap_err();
            assert!(is_broken_pipe(&err), "{format}: {err}");
        }
    }
}
