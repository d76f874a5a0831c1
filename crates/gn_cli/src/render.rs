use std::io::Write;

use chrono::Local;
use gn_core::clock::copyright_line;
use gn_core::pipeline::Projection;
use gn_core::share::ShareLink;
use gn_core::types::NO_IMAGE;
use gn_core::{Result, Route, Session};

pub const TITLE: &str = "Ginja News Website";
pub const HEADLINE: &str = "Latest headline News from Around the Nigeria";

pub fn header<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    writeln!(out, "{}", session.date_line())?;
    writeln!(out, "== {} ==", TITLE)?;
    let nav: Vec<String> = Route::NAVIGATION
        .iter()
        .map(|route| format!("{} ({})", route.label(), route.path()))
        .collect();
    writeln!(out, "{}", nav.join(" | "))?;
    writeln!(out, "[theme] {}", session.theme().toggle_label())?;
    writeln!(
        out,
        "[speech] {}",
        session.narration_service().unwrap_or("unavailable")
    )?;
    Ok(())
}

pub fn error<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    if let Some(message) = session.error_message() {
        writeln!(out, "Error: {}", message)?;
        writeln!(out, "Type `retry` to reload.")?;
    }
    Ok(())
}

pub fn page<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    error(session, out)?;
    let projection = session.page();
    writeln!(out)?;
    writeln!(out, "{}", HEADLINE)?;
    describe_query(session, out)?;

    if projection.is_empty() {
        if session.is_loading() {
            writeln!(out, "Loading articles...")?;
        } else {
            writeln!(out, "No articles to show.")?;
        }
        return Ok(());
    }

    let speaking = session.is_speaking();
    for (i, article) in projection.items.iter().enumerate() {
        let marker = if session.focus() == Some(i) { ">" } else { " " };
        writeln!(out, "{}{:>3}. {}", marker, i + 1, article.title)?;
        writeln!(
            out,
            "      [{}] {} | {}",
            article.section, article.published_at.raw, article.url
        )?;
        writeln!(
            out,
            "      image: {}",
            article.image_url.as_deref().unwrap_or(NO_IMAGE)
        )?;
        writeln!(out, "      {}", article.description)?;
        writeln!(
            out,
            "      ({} | share {} twitter|facebook|linkedin)",
            if speaking { "Pause Article" } else { "Play Article" },
            i + 1
        )?;
    }
    pagination(&projection, out)
}

fn describe_query<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let query = session.view().query();
    writeln!(
        out,
        "search: {:?} | sort: {} | section: {}",
        query.search,
        query.sort,
        query.section().unwrap_or("all")
    )?;
    Ok(())
}

pub fn pagination<W: Write>(projection: &Projection<'_>, out: &mut W) -> Result<()> {
    let pages: Vec<String> = projection
        .page_numbers()
        .map(|n| {
            if n == projection.page {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        })
        .collect();
    writeln!(out, "Pages: {}", pages.join(" "))?;
    Ok(())
}

pub fn sections<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let mut options = vec!["all".to_string()];
    options.extend(session.sections().iter().cloned());
    writeln!(out, "Sections: {}", options.join(", "))?;
    Ok(())
}

pub fn share_links<W: Write>(links: &[ShareLink], out: &mut W) -> Result<()> {
    for link in links {
        writeln!(out, "Share on {}: {}", link.platform, link.url)?;
    }
    Ok(())
}

pub fn comments<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    writeln!(out, "Comments ({}):", session.comments().len())?;
    for comment in session.comments() {
        writeln!(out, "  - {}", comment.text())?;
    }
    Ok(())
}

pub fn footer<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", copyright_line(&Local::now()))?;
    Ok(())
}
