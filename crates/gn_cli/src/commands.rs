use std::str::FromStr;

use gn_core::pipeline::ALL_SECTIONS;
use gn_core::{Route, SharePlatform, SortKey};

pub const HELP: &str = "\
Commands:
  search <term>          filter titles (empty term clears)
  sort newest|oldest     order by publication date
  filter <section>|all   show one section
  sections               list sections
  go <path>              open a route: / /news /business /sports /worldNews /articles/<c>
  page <n> | next | prev move between pages
  down | up              move the selection
  play [n]               read an article aloud (selected one if n is omitted)
  pause                  pause or resume reading
  share <n> [platform]   share links for an article
  comment <text>         add a comment
  comments               show comments
  theme                  switch light/dark
  retry                  reload everything
  show                   redraw the page
  quit";

/// One line typed at the browse prompt. Article numbers are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Search(String),
    Sort(SortKey),
    Filter(Option<String>),
    Sections,
    Go(Route),
    Page(usize),
    NextPage,
    PrevPage,
    FocusDown,
    FocusUp,
    Play(Option<usize>),
    Toggle,
    Share(usize, Option<SharePlatform>),
    Comment(String),
    Comments,
    Theme,
    Retry,
    Show,
    Help,
    Quit,
}

fn number(arg: &str, what: &str) -> Result<usize, String> {
    match arg.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("{} must be a number from 1", what)),
        Ok(n) => Ok(n),
    }
}

impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let arg = rest.trim();

        let input = match word.trim_end() {
            // The search term is kept as typed, surrounding spaces included.
            "search" | "/" => Input::Search(rest.to_string()),
            "sort" => Input::Sort(arg.parse()?),
            "filter" | "section" => {
                if arg.is_empty() || arg.eq_ignore_ascii_case(ALL_SECTIONS) {
                    Input::Filter(None)
                } else {
                    Input::Filter(Some(arg.to_string()))
                }
            }
            "sections" => Input::Sections,
            "go" => Input::Go(
                Route::parse(arg).ok_or_else(|| format!("Unknown route: {}", arg))?,
            ),
            "page" => Input::Page(number(arg, "page")?),
            "next" | "n" => Input::NextPage,
            "prev" | "p" => Input::PrevPage,
            "down" | "j" => Input::FocusDown,
            "up" | "k" => Input::FocusUp,
            "play" => {
                if arg.is_empty() {
                    Input::Play(None)
                } else {
                    Input::Play(Some(number(arg, "article")?))
                }
            }
            "pause" | "resume" | "toggle" => Input::Toggle,
            "share" => {
                let mut parts = arg.split_whitespace();
                let index = number(parts.next().unwrap_or(""), "article")?;
                let platform = parts.next().map(str::parse).transpose()?;
                Input::Share(index, platform)
            }
            "comment" => Input::Comment(rest.to_string()),
            "comments" => Input::Comments,
            "theme" => Input::Theme,
            "retry" | "reload" => Input::Retry,
            "" | "show" | "ls" => Input::Show,
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            other => return Err(format!("Unknown command: {} (type `help`)", other)),
        };
        Ok(input)
    }
}
