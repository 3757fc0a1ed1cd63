use std::fmt::Write;

use crate::collection::EmbedCollection;
use crate::embed::Embed;

const STYLE: &str = "\
body{background:#313338;color:#dbdee1;font-family:sans-serif}\
.embed{display:flex;max-width:520px;margin:12px;padding:8px 16px 16px 12px;\
background:#2b2d31;border-left:4px solid;border-radius:4px}\
.embed.skipped{opacity:.5}\
.body{flex:1}\
.author{display:flex;align-items:center;gap:8px;font-size:14px;font-weight:600}\
.author img,.footer img{width:20px;height:20px;border-radius:50%}\
.title{font-weight:700;margin-top:8px}\
.description{white-space:pre-wrap;font-size:14px;margin-top:8px}\
.fields{display:flex;flex-wrap:wrap;gap:8px;margin-top:8px}\
.field{flex-basis:100%;font-size:14px}\
.field.inline{flex-basis:30%}\
.field .name{font-weight:600}\
.thumbnail{max-width:80px;max-height:80px;margin-left:16px;border-radius:4px}\
.image{max-width:100%;margin-top:16px;border-radius:4px}\
.footer{display:flex;align-items:center;gap:8px;font-size:12px;margin-top:8px}";

/// Renders the whole collection as a standalone HTML page.
///
/// Embeds that would be dropped from the export are still shown, but faded.
#[must_use]
pub fn render(collection: &EmbedCollection) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>Embed Preview</title><style>{STYLE}</style>");
    html.push_str("</head><body>\n");
    for embed in collection {
        render_embed(&mut html, embed);
    }
    html.push_str("</body></html>\n");
    html
}

fn render_embed(html: &mut String, embed: &Embed) {
    let class = if embed.is_exportable() {
        "embed"
    } else {
        "embed skipped"
    };
    let _ = write!(
        html,
        "<div class=\"{class}\" style=\"border-color:{}\"><div class=\"body\">",
        embed.render_color()
    );

    if !embed.author.name.is_empty() {
        html.push_str("<div class=\"author\">");
        push_icon(html, &embed.author.icon_url);
        let _ = write!(html, "<span>{}</span></div>", escape(&embed.author.name));
    }
    if !embed.title.is_empty() {
        let _ = write!(html, "<div class=\"title\">{}</div>", escape(&embed.title));
    }
    if !embed.description.is_empty() {
        let _ = write!(
            html,
            "<div class=\"description\">{}</div>",
            escape(&embed.description)
        );
    }
    if !embed.fields.is_empty() {
        html.push_str("<div class=\"fields\">");
        for field in &embed.fields {
            let class = if field.inline { "field inline" } else { "field" };
            let _ = write!(
                html,
                "<div class=\"{class}\"><div class=\"name\">{}</div><div>{}</div></div>",
                escape(&field.name),
                escape(&field.value)
            );
        }
        html.push_str("</div>");
    }
    if let Some(url) = embed.image_url() {
        let _ = write!(html, "<img class=\"image\" src=\"{}\">", escape(url));
    }
    if !embed.footer.text.is_empty() {
        html.push_str("<div class=\"footer\">");
        push_icon(html, &embed.footer.icon_url);
        let _ = write!(html, "<span>{}</span></div>", escape(&embed.footer.text));
    }
    html.push_str("</div>");

    if let Some(url) = embed.thumbnail_url() {
        let _ = write!(html, "<img class=\"thumbnail\" src=\"{}\">", escape(url));
    }
    html.push_str("</div>\n");
}

fn push_icon(html: &mut String, url: &str) {
    if !url.is_empty() {
        let _ = write!(html, "<img src=\"{}\">", escape(url));
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
