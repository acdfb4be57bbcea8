//! Card markup.
//!
//! A single row: cover art, title with status chips, and playback buttons.
//! Markup is written through [`std::fmt::Display`] so it can be streamed into
//! any writer; [`render`] is the convenience entry point.

use std::fmt;

use crate::command::Control;
use crate::config::CardConfig;
use crate::resolve::DisplayModel;

/// Element type the host registers the card under.
pub const CARD_ELEMENT: &str = "toniebox-mini-media-card";

pub const STYLE: &str = "\
.toniebox-mini-media-card { --tbx-gap: 12px; --tbx-radius: 16px; --tbx-pad: 12px; }
.tbx-wrap { display: grid; grid-template-columns: 56px 1fr auto; align-items: center; gap: var(--tbx-gap); padding: var(--tbx-pad); }
.tbx-cover { width: 56px; height: 56px; border-radius: var(--tbx-radius); overflow: hidden; background: var(--secondary-background-color); display: grid; place-items: center; border: 1px solid var(--divider-color); }
.tbx-cover img { width: 100%; height: 100%; object-fit: cover; display: block; }
.tbx-main { display: grid; gap: 4px; min-width: 0; }
.tbx-title { font-weight: 600; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.tbx-sub { color: var(--secondary-text-color); font-size: 0.9em; display: flex; gap: 10px; align-items: center; }
.tbx-chip { display: inline-flex; gap: 6px; align-items: center; padding: 2px 8px; border-radius: 999px; border: 1px solid var(--divider-color); }
.tbx-right { display: flex; gap: 8px; align-items: center; }
mwc-icon-button { --mdc-icon-button-size: 40px; }
ha-state-icon.tbx-charge { color: var(--state-icon-active-color); }
.muted { color: var(--disabled-text-color); }
";

struct Button {
    control: Control,
    label: &'static str,
    title: &'static str,
}

const BUTTONS: [Button; 3] = [
    Button {
        control: Control::Previous,
        label: "prev",
        title: "Previous track",
    },
    Button {
        control: Control::PlayOrPause,
        label: "play-pause",
        title: "Play/Pause",
    },
    Button {
        control: Control::Next,
        label: "next",
        title: "Next track",
    },
];

/// Text with `& < > "` replaced by entities.
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['&', '<', '>', '"']) {
            f.write_str(&rest[..pos])?;
            f.write_str(match rest.as_bytes()[pos] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                _ => "&quot;",
            })?;
            rest = &rest[pos + 1..];
        }
        f.write_str(rest)
    }
}

pub fn escape(text: &str) -> String {
    Escaped(text).to_string()
}

/// The inner row of the card, without the card frame and stylesheet.
pub struct Content<'a> {
    pub config: &'a CardConfig,
    pub model: &'a DisplayModel,
}

impl fmt::Display for Content<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;

        write!(f, r#"<div class="tbx-wrap"><div class="tbx-cover">"#)?;
        match &model.cover_url {
            Some(url) => write!(f, r#"<img src="{}" alt="cover"/>"#, Escaped(url))?,
            None => write!(f, r#"<ha-state-icon icon="mdi:cube-outline"></ha-state-icon>"#)?,
        }
        write!(f, "</div>")?;

        write!(
            f,
            r#"<div class="tbx-main"><div class="tbx-title">{}</div><div class="tbx-sub">"#,
            Escaped(&model.title)
        )?;
        write_chip(f, "mdi:music", &model.playback_state)?;
        if self.config.show_battery {
            if let Some(label) = model.battery_label() {
                write_chip(f, "mdi:battery", &label)?;
            }
        }
        if model.is_charging {
            write!(
                f,
                r#"<ha-state-icon class="tbx-charge" icon="mdi:lightning-bolt"></ha-state-icon>"#
            )?;
        }
        if self.config.show_rssi {
            if let Some(label) = model.signal_label() {
                write!(f, r#"<span class="muted">{}</span>"#, Escaped(&label))?;
            }
        }
        write!(f, "</div></div>")?;

        write!(f, r#"<div class="tbx-right">"#)?;
        for button in &BUTTONS {
            write!(
                f,
                r#"<mwc-icon-button aria-label="{}" title="{}" data-control="{}"><ha-icon icon="{}"></ha-icon></mwc-icon-button>"#,
                button.label,
                button.title,
                button.control,
                button_icon(button.control, model.is_playing)
            )?;
        }
        write!(f, "</div></div>")
    }
}

fn write_chip(f: &mut fmt::Formatter<'_>, icon: &str, text: &str) -> fmt::Result {
    write!(
        f,
        r#"<span class="tbx-chip"><ha-state-icon icon="{}"></ha-state-icon><span>{}</span></span>"#,
        icon,
        Escaped(text)
    )
}

fn button_icon(control: Control, is_playing: bool) -> &'static str {
    match control {
        Control::Previous => "mdi:skip-previous",
        Control::Next => "mdi:skip-next",
        Control::PlayOrPause if is_playing => "mdi:pause",
        Control::PlayOrPause => "mdi:play",
    }
}

/// Render the complete card: frame, stylesheet and content.
pub fn render(config: &CardConfig, model: &DisplayModel) -> String {
    format!(
        r#"<ha-card class="{}" aria-label="{}"><style>{}</style>{}</ha-card>"#,
        CARD_ELEMENT,
        Escaped(&config.name),
        STYLE,
        Content { config, model }
    )
}
