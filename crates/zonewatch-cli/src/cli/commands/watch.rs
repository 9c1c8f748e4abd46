//! `zonewatch watch` - interactive lookups driven by stdin lines.

use anyhow::Result;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Context;
use crate::output::ConsoleSink;

/// One parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Domain(String),
    Token(String),
    Cancel,
    Quit,
}

fn parse_line(line: &str) -> Option<Input> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match word {
        "domain" | "d" => Some(Input::Domain(rest.to_string())),
        "token" | "t" => Some(Input::Token(rest.to_string())),
        "cancel" => Some(Input::Cancel),
        "quit" | "exit" | "q" => Some(Input::Quit),
        _ => None,
    }
}

pub async fn execute(ctx: Context) -> Result<()> {
    let mut session = ctx.session(ConsoleSink::new(ctx.output_format))?;
    let mut token = ctx.token_or_empty().to_string();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    if !token.is_empty() {
        session.submit_credential(&token).await;
    }

    loop {
        if !stdin_open {
            if session.is_settled() {
                break;
            }
            session.step().await;
            continue;
        }

        tokio::select! {
            event = session.next_event() => session.apply(event).await,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_line(&line) {
                    Some(Input::Domain(domain)) => {
                        session.submit_query(&domain, &token).await;
                    }
                    Some(Input::Token(new_token)) => {
                        token = new_token;
                        session.submit_credential(&token).await;
                    }
                    Some(Input::Cancel) => session.cancel_all(),
                    Some(Input::Quit) => {
                        session.cancel_all();
                        break;
                    }
                    None => eprintln!(
                        "{} expected `domain <name>`, `token <tok>`, `cancel` or `quit`",
                        "Unknown input:".yellow().bold()
                    ),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("domain example.com"), Some(Input::Domain("example.com".into())));
        assert_eq!(parse_line("  token   abc  "), Some(Input::Token("abc".into())));
        assert_eq!(parse_line("token"), Some(Input::Token(String::new())));
        assert_eq!(parse_line("cancel"), Some(Input::Cancel));
        assert_eq!(parse_line("quit"), Some(Input::Quit));
        assert_eq!(parse_line("lookup example.com"), None);
    }
}
