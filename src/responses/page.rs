use axum::response::{Html, IntoResponse, Response};
use entities::{album, event};

use crate::forms::{FormErrors, LoginForm, ProfileEditForm, RegistrationForm};
use crate::responses::album_response::FeaturedAlbum;

const BASE_HTML: &str = include_str!("../../templates/base.html");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Success => "success",
            MessageType::Error => "error",
        }
    }
}

/// A page to render: the template plus the context it is rendered with.
#[derive(Clone, Debug, PartialEq)]
pub enum Page {
    Landing,
    Home,
    Albums {
        albums: Vec<FeaturedAlbum>,
    },
    Artists,
    Events {
        events: Vec<event::Model>,
    },
    EventDetail {
        event: event::Model,
    },
    /// Only the id from the path; no album is looked up.
    AlbumDetail {
        id: i32,
    },
    Subscribe,
    Unsubscribe {
        message: String,
        message_type: Option<MessageType>,
    },
    Login {
        form: LoginForm,
        errors: FormErrors,
    },
    Register {
        form: RegistrationForm,
        errors: FormErrors,
    },
    Profile {
        form: ProfileEditForm,
        errors: FormErrors,
        favorites: Vec<album::Model>,
    },
    NotFound {
        what: String,
    },
}

impl Page {
    /// Outcome of an unsubscribe submission. Nothing is unsubscribed; the page
    /// only reports what would have happened.
    pub fn unsubscribe_result(email: Option<&str>) -> Self {
        match email.filter(|email| !email.is_empty()) {
            Some(email) => Page::Unsubscribe {
                message: format!("{} has been successfully unsubscribed from EchoPulse.", email),
                message_type: Some(MessageType::Success),
            },
            None => Page::Unsubscribe {
                message: "Please provide a valid email.".to_string(),
                message_type: Some(MessageType::Error),
            },
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Landing => "landing.html",
            Page::Home => "home.html",
            Page::Albums { .. } => "albums.html",
            Page::Artists => "artists.html",
            Page::Events { .. } => "events.html",
            Page::EventDetail { .. } => "event_detail.html",
            Page::AlbumDetail { .. } => "album_detail.html",
            Page::Subscribe => "subscribe.html",
            Page::Unsubscribe { .. } => "unsubscribe.html",
            Page::Login { .. } => "login.html",
            Page::Register { .. } => "register.html",
            Page::Profile { .. } => "profile.html",
            Page::NotFound { .. } => "404.html",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Page::Landing => "Welcome",
            Page::Home => "Home",
            Page::Albums { .. } => "Albums",
            Page::Artists => "Artists",
            Page::Events { .. } => "Events",
            Page::EventDetail { .. } => "Event",
            Page::AlbumDetail { .. } => "Album",
            Page::Subscribe => "Subscribe",
            Page::Unsubscribe { .. } => "Unsubscribe",
            Page::Login { .. } => "Log in",
            Page::Register { .. } => "Register",
            Page::Profile { .. } => "Profile",
            Page::NotFound { .. } => "Not found",
        }
    }

    pub fn render(&self) -> String {
        let body = self.body();
        BASE_HTML
            .replace("{{ title }}", self.title())
            .replacen("{{ content }}", &body, 1)
    }

    fn body(&self) -> String {
        let mut out = format!(
            "<section class=\"page\" data-template=\"{}\">\n",
            self.template_name()
        );
        out.push_str(&self.content());
        out.push_str("</section>\n");
        out
    }

    fn content(&self) -> String {
        match self {
            Page::Landing => "<h1>Feel the pulse of live music</h1>\n\
                 <p>Discover albums, artists and upcoming events.</p>\n\
                 <p><a href=\"/login/\">Log in</a> or <a href=\"/register/\">create an account</a>.</p>\n"
                .to_string(),
            Page::Home => "<h1>Welcome back</h1>\n\
                 <ul><li><a href=\"/albums/\">Albums</a></li>\
                 <li><a href=\"/artist/\">Artists</a></li>\
                 <li><a href=\"/event/\">Events</a></li></ul>\n"
                .to_string(),
            Page::Albums { albums } => {
                let mut out = String::from("<h1>Albums</h1>\n<ul class=\"albums\">\n");
                for album in albums {
                    out.push_str(&format!(
                        "<li><img src=\"{}\" alt=\"{}\"><h2>{}</h2><p>{} ({})</p></li>\n",
                        escape(album.cover),
                        escape(album.title),
                        escape(album.title),
                        escape(album.artist),
                        album.year
                    ));
                }
                out.push_str("</ul>\n");
                out
            }
            Page::Artists => {
                "<h1>Artists</h1>\n<p>Meet the artists behind the music.</p>\n".to_string()
            }
            Page::Events { events } => {
                let mut out = String::from("<h1>Events</h1>\n");
                if events.is_empty() {
                    out.push_str("<p>No upcoming events.</p>\n");
                    return out;
                }
                out.push_str("<ul class=\"events\">\n");
                for event in events {
                    out.push_str(&format!(
                        "<li><a href=\"/event/{}/\">{}</a> <time>{}</time> at {}</li>\n",
                        event.id,
                        escape(&event.title),
                        event.date.format("%B %-d, %Y %H:%M"),
                        escape(&event.venue)
                    ));
                }
                out.push_str("</ul>\n");
                out
            }
            Page::EventDetail { event } => format!(
                "<h1>{}</h1>\n<p><time datetime=\"{}\">{}</time></p>\n<p class=\"venue\">{}</p>\n<div class=\"description\">{}</div>\n",
                escape(&event.title),
                event.date.to_rfc3339(),
                event.date.format("%B %-d, %Y %H:%M"),
                escape(&event.venue),
                escape(&event.description)
            ),
            Page::AlbumDetail { id } => format!(
                "<h1>Album</h1>\n<p class=\"album-id\" data-album-id=\"{id}\">Album #{id}</p>\n"
            ),
            Page::Subscribe => "<h1>Subscribe</h1>\n\
                 <p>Get news about new albums and events in your inbox.</p>\n"
                .to_string(),
            Page::Unsubscribe {
                message,
                message_type,
            } => {
                let mut out = String::from("<h1>Unsubscribe</h1>\n");
                let kind = message_type.map(|t| t.as_str()).unwrap_or("");
                if !message.is_empty() {
                    out.push_str(&format!(
                        "<p class=\"message {kind}\" data-message-type=\"{kind}\">{}</p>\n",
                        escape(message)
                    ));
                }
                out.push_str(
                    "<form method=\"post\" action=\"/unsubscribe/\">\
                     <input type=\"email\" name=\"email\" placeholder=\"Email\">\
                     <button type=\"submit\">Unsubscribe</button></form>\n",
                );
                out
            }
            Page::Login { form, errors } => {
                let mut out = String::from("<h1>Log in</h1>\n");
                out.push_str(&non_field_errors(errors));
                out.push_str("<form method=\"post\" action=\"/login/\">\n");
                if let Some(next) = &form.next {
                    out.push_str(&format!(
                        "<input type=\"hidden\" name=\"next\" value=\"{}\">\n",
                        escape(next)
                    ));
                }
                out.push_str(&input("username", "text", "Username", &form.username, errors));
                out.push_str(&input("password", "password", "Password", "", errors));
                out.push_str("<button type=\"submit\">Log in</button>\n</form>\n");
                out
            }
            Page::Register { form, errors } => {
                let mut out = String::from("<h1>Register</h1>\n");
                out.push_str(&non_field_errors(errors));
                out.push_str("<form method=\"post\" action=\"/register/\">\n");
                out.push_str(&input("username", "text", "Username", &form.username, errors));
                out.push_str(&input("password1", "password", "Password", "", errors));
                out.push_str(&input(
                    "password2",
                    "password",
                    "Password confirmation",
                    "",
                    errors,
                ));
                out.push_str("<button type=\"submit\">Register</button>\n</form>\n");
                out
            }
            Page::Profile {
                form,
                errors,
                favorites,
            } => {
                let mut out = String::from("<h1>Profile</h1>\n");
                out.push_str(&non_field_errors(errors));
                out.push_str("<form method=\"post\" action=\"/profile/\">\n");
                for widget in ProfileEditForm::WIDGETS.iter() {
                    out.push_str(&input(
                        widget.field,
                        widget.input_type,
                        widget.placeholder,
                        form.value(widget.field),
                        errors,
                    ));
                }
                out.push_str("<button type=\"submit\">Save</button>\n</form>\n");
                out.push_str("<h2>Favorite albums</h2>\n");
                if favorites.is_empty() {
                    out.push_str("<p>No favorites yet.</p>\n");
                    return out;
                }
                out.push_str("<ul class=\"favorites\">\n");
                for album in favorites {
                    out.push_str(&format!(
                        "<li><a href=\"/album/{}/\">{}</a> by {}</li>\n",
                        album.id,
                        escape(&album.to_string()),
                        escape(&album.artist)
                    ));
                }
                out.push_str("</ul>\n");
                out
            }
            Page::NotFound { what } => {
                format!("<h1>Not found</h1>\n<p>{}</p>\n", escape(what))
            }
        }
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

fn non_field_errors(errors: &FormErrors) -> String {
    let items: String = errors
        .non_field()
        .map(|message| format!("<li>{}</li>\n", escape(message)))
        .collect();
    if items.is_empty() {
        return String::new();
    }
    format!("<ul class=\"errorlist nonfield\">\n{items}</ul>\n")
}

fn input(
    name: &str,
    input_type: &str,
    placeholder: &str,
    value: &str,
    errors: &FormErrors,
) -> String {
    let messages: String = errors
        .for_field(name)
        .map(|message| format!("<span class=\"errorlist\">{}</span>\n", escape(message)))
        .collect();
    format!(
        "<p>\n{messages}<input type=\"{input_type}\" name=\"{name}\" id=\"id_{name}\" placeholder=\"{}\" value=\"{}\">\n</p>\n",
        escape(placeholder),
        escape(value)
    )
}

pub(crate) fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::INVALID_LOGIN;
    use crate::responses::album_response::featured_albums;
    use chrono::{TimeZone, Utc};

    fn sample_event() -> event::Model {
        event::Model {
            id: 7,
            title: "Rock & Roll Night".to_string(),
            date: Utc.with_ymd_and_hms(2025, 8, 9, 20, 30, 0).unwrap(),
            venue: "The <Basement>".to_string(),
            description: "Loud.".to_string(),
        }
    }

    #[test]
    fn unsubscribe_with_email_succeeds() {
        let page = Page::unsubscribe_result(Some("fan@example.com"));
        assert_eq!(
            page,
            Page::Unsubscribe {
                message: "fan@example.com has been successfully unsubscribed from EchoPulse."
                    .to_string(),
                message_type: Some(MessageType::Success),
            }
        );
        assert_eq!(page.template_name(), "unsubscribe.html");
    }

    #[test]
    fn unsubscribe_without_email_errors() {
        for email in [None, Some("")] {
            match Page::unsubscribe_result(email) {
                Page::Unsubscribe {
                    message,
                    message_type,
                } => {
                    assert_eq!(message, "Please provide a valid email.");
                    assert_eq!(message_type, Some(MessageType::Error));
                }
                other => panic!("unexpected page {:?}", other),
            }
        }
    }

    #[test]
    fn render_fills_the_layout() {
        let html = Page::Landing.render();
        assert!(html.contains("<title>Welcome | EchoPulse</title>"));
        assert!(html.contains("data-template=\"landing.html\""));
        assert!(!html.contains("{{ content }}"));
    }

    #[test]
    fn event_fields_are_escaped() {
        let html = Page::EventDetail {
            event: sample_event(),
        }
        .render();
        assert!(html.contains("Rock &amp; Roll Night"));
        assert!(html.contains("The &lt;Basement&gt;"));
        assert!(html.contains("August 9, 2025 20:30"));
    }

    #[test]
    fn albums_page_lists_all_featured_albums() {
        let html = Page::Albums {
            albums: featured_albums(),
        }
        .render();
        assert_eq!(html.matches("<li><img").count(), 6);
        assert!(html.contains("Hybrid Theory"));
        assert!(html.contains("Arctic Monkeys (2013)"));
    }

    #[test]
    fn field_errors_sit_above_their_input() {
        let mut errors = FormErrors::default();
        errors.add("username", "Taken.");
        let html = Page::Register {
            form: RegistrationForm {
                username: "kim".to_string(),
                ..Default::default()
            },
            errors,
        }
        .render();
        assert!(html.contains(
            "<p>\n<span class=\"errorlist\">Taken.</span>\n<input type=\"text\" name=\"username\""
        ));
        assert!(html.contains("value=\"kim\""));
        assert!(!html.contains("errorlist nonfield"));
    }

    #[test]
    fn login_page_shows_errors_but_never_the_password() {
        let mut errors = FormErrors::default();
        errors.add_non_field(INVALID_LOGIN);
        let html = Page::Login {
            form: LoginForm {
                username: "alice".to_string(),
                password: "hunter22".to_string(),
                next: Some("/profile/".to_string()),
            },
            errors,
        }
        .render();
        assert!(html.contains("Please enter a correct username and password."));
        assert!(html.contains("value=\"alice\""));
        assert!(html.contains("name=\"next\" value=\"/profile/\""));
        assert!(!html.contains("hunter22"));
    }

    #[test]
    fn escape_covers_html_specials() {
        assert_eq!(escape("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    }
}
