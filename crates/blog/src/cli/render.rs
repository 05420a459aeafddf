//! Output formatting.
//!
//! Every function here turns a view model from `blogapp::pages` into a
//! string; commands print the result. Nothing here talks to the API.

use super::styles::Palette;
use blogapp::i18n::Language;
use blogapp::model::{Post, Tag, User};
use blogapp::pages::admin::AdminPosts;
use blogapp::pages::home::{HomeView, PostCard};
use blogapp::pages::post_detail::PostView;
use blogapp::pages::profile::ProfileView;
use blogapp::pagination::Pager;
use blogapp::text::{format_date, strip_html};
use chrono::{Local, NaiveDateTime};
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const ID_WIDTH: usize = 6;
const RULE: &str = "────────────────────────────────────────";

/// Fixed interface words in both languages.
struct Labels {
    no_posts: &'static str,
    by: &'static str,
    page: &'static str,
    showing: &'static str,
    search: &'static str,
    editable: &'static str,
    your_posts: &'static str,
    no_tags: &'static str,
    no_users: &'static str,
    more: &'static str,
}

const TR: Labels = Labels {
    no_posts: "Henüz blog yazısı yok.",
    by: "yazar",
    page: "Sayfa",
    showing: "gösteriliyor",
    search: "Arama",
    editable: "Düzenleyebilirsiniz: blog edit / blog delete",
    your_posts: "Yazılarınız",
    no_tags: "Etiket yok.",
    no_users: "Kullanıcı yok.",
    more: "daha",
};

const EN: Labels = Labels {
    no_posts: "No blog posts yet.",
    by: "by",
    page: "Page",
    showing: "showing",
    search: "Search",
    editable: "You can change this post: blog edit / blog delete",
    your_posts: "Your posts",
    no_tags: "No tags.",
    no_users: "No users.",
    more: "more",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Tr => &TR,
        Language::En => &EN,
    }
}

/// The home listing: one block per card, then the pager.
pub fn post_list(view: &HomeView, language: Language, palette: &Palette) -> String {
    let l = labels(language);
    let mut out = String::new();

    if let Some(search) = &view.search {
        let _ = writeln!(out, "{}", palette.muted.apply_to(format!("{}: \"{}\"", l.search, search)));
    }
    if view.is_empty() {
        let _ = writeln!(out, "{}", palette.muted.apply_to(l.no_posts));
        return out;
    }

    for card in &view.cards {
        out.push_str(&card_block(card, language, palette));
        out.push('\n');
    }

    if view.pager.is_visible() {
        let (from, to) = view.showing();
        let _ = writeln!(
            out,
            "{}  {}",
            pager_line(&view.pager, language, palette),
            palette.muted.apply_to(format!(
                "{}-{} / {} {}",
                from, to, view.total_elements, l.showing
            ))
        );
    }
    out
}

fn card_block(card: &PostCard, language: Language, palette: &Palette) -> String {
    let l = labels(language);
    let id = format!("{:>width$}", card.id, width = ID_WIDTH - 2);
    let title_width = LINE_WIDTH.saturating_sub(ID_WIDTH);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}",
        palette.accent.apply_to(id),
        palette.title.apply_to(fit(&card.title, title_width))
    );
    let _ = writeln!(
        out,
        "{:indent$}{}",
        "",
        palette.muted.apply_to(format!(
            "{} {} · {} · {}",
            l.by,
            card.author,
            card.date,
            time_ago(card.created_at, Local::now().naive_local())
        )),
        indent = ID_WIDTH
    );
    if !card.excerpt.is_empty() {
        for line in wrap(&card.excerpt, title_width) {
            let _ = writeln!(out, "{:indent$}{}", "", line, indent = ID_WIDTH);
        }
    }
    if !card.tags.is_empty() {
        let mut tags = card
            .tags
            .iter()
            .map(|t| palette.tag.apply_to(format!("#{}", t)).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        if card.hidden_tags > 0 {
            let _ = write!(
                tags,
                " {}",
                palette.muted.apply_to(format!("+{} {}", card.hidden_tags, l.more))
            );
        }
        let _ = writeln!(out, "{:indent$}{}", "", tags, indent = ID_WIDTH);
    }
    out
}

/// `‹ 1 2 [3] 4 5 ›` with 1-based page numbers.
pub fn pager_line(pager: &Pager, language: Language, palette: &Palette) -> String {
    let l = labels(language);
    let mut parts = Vec::new();
    parts.push(if pager.has_prev() {
        "‹".to_string()
    } else {
        palette.faint.apply_to("‹").to_string()
    });
    for page in pager.window() {
        if page == pager.current {
            parts.push(palette.accent.apply_to(format!("[{}]", u64::from(page) + 1)).to_string());
        } else {
            parts.push((u64::from(page) + 1).to_string());
        }
    }
    parts.push(if pager.has_next() {
        "›".to_string()
    } else {
        palette.faint.apply_to("›").to_string()
    });
    format!("{} {}", l.page, parts.join(" "))
}

pub fn post_detail(view: &PostView, language: Language, palette: &Palette) -> String {
    let l = labels(language);
    let post = &view.post;
    let mut out = String::new();

    let _ = writeln!(out, "{}", palette.title.apply_to(&post.title));
    let _ = writeln!(
        out,
        "{}",
        palette
            .muted
            .apply_to(format!("{} {} · {}", l.by, post.author_username, view.date))
    );
    if !post.tags.is_empty() {
        let _ = writeln!(out, "{}", tag_line(&post.tags, palette));
    }
    let _ = writeln!(out, "{}", palette.faint.apply_to(RULE));
    for paragraph in strip_html(&post.content)
        .split("  ")
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        for line in wrap(paragraph, LINE_WIDTH) {
            let _ = writeln!(out, "{}", line);
        }
        out.push('\n');
    }
    if view.can_edit {
        let _ = writeln!(out, "{}", palette.muted.apply_to(l.editable));
    }
    out
}

pub fn profile(view: &ProfileView, language: Language, palette: &Palette) -> String {
    let l = labels(language);
    let mut out = user_card(&view.user, palette);
    let _ = writeln!(out, "{}", palette.faint.apply_to(RULE));
    let _ = writeln!(out, "{} ({})", l.your_posts, view.posts.len());
    if view.posts.is_empty() {
        let _ = writeln!(out, "{}", palette.muted.apply_to(l.no_posts));
    }
    for post in &view.posts {
        out.push_str(&post_row(post, language, palette));
    }
    out
}

pub fn user_card(user: &User, palette: &Palette) -> String {
    format!(
        "{} {}\n{}\n",
        palette.title.apply_to(&user.username),
        palette.tag.apply_to(user.role),
        palette.muted.apply_to(&user.email)
    )
}

pub fn admin_posts(view: &AdminPosts, language: Language, palette: &Palette) -> String {
    let l = labels(language);
    let mut out = String::new();
    if view.page.content.is_empty() {
        let _ = writeln!(out, "{}", palette.muted.apply_to(l.no_posts));
        return out;
    }
    for post in &view.page.content {
        out.push_str(&post_row(post, language, palette));
    }
    if view.pager.is_visible() {
        let _ = writeln!(out, "{}", pager_line(&view.pager, language, palette));
    }
    out
}

/// One line per post: id, title, author, date.
fn post_row(post: &Post, language: Language, palette: &Palette) -> String {
    let date = format_date(&post.created_at, language, false);
    let meta = format!("{} · {}", post.author_username, date);
    let title_width = LINE_WIDTH.saturating_sub(ID_WIDTH + meta.width() + 2);
    format!(
        "{}  {}  {}\n",
        palette
            .accent
            .apply_to(format!("{:>width$}", post.id, width = ID_WIDTH - 2)),
        fit(&post.title, title_width),
        palette.muted.apply_to(meta)
    )
}

pub fn tags(tags: &[Tag], language: Language, palette: &Palette) -> String {
    if tags.is_empty() {
        return format!("{}\n", palette.muted.apply_to(labels(language).no_tags));
    }
    tags.iter()
        .map(|t| {
            format!(
                "{}  {}\n",
                palette
                    .accent
                    .apply_to(format!("{:>width$}", t.id, width = ID_WIDTH - 2)),
                palette.tag.apply_to(&t.name)
            )
        })
        .collect()
}

pub fn users(users: &[User], language: Language, palette: &Palette) -> String {
    if users.is_empty() {
        return format!("{}\n", palette.muted.apply_to(labels(language).no_users));
    }
    let name_width = users.iter().map(|u| u.username.width()).max().unwrap_or(0);
    users
        .iter()
        .map(|u| {
            format!(
                "{}  {}  {:<6}  {}\n",
                palette
                    .accent
                    .apply_to(format!("{:>width$}", u.id, width = ID_WIDTH - 2)),
                fit(&u.username, name_width),
                u.role.to_string(),
                palette.muted.apply_to(&u.email)
            )
        })
        .collect()
}

fn tag_line(tags: &[Tag], palette: &Palette) -> String {
    tags.iter()
        .map(|t| palette.tag.apply_to(format!("#{}", t.name)).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Relative age of a server timestamp. Server times carry no zone and are
/// read as local time.
pub fn time_ago(at: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now.signed_duration_since(at).to_std().unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

/// Pads or cuts `text` to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Greedy word wrap by display width.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
