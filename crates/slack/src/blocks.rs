use serde::Serialize;

use affirmbot_core::domain::affirmation::{Affirmation, StatsSnapshot};
use affirmbot_core::{CommandProfile, Submission, MAX_QUOTE_CHARS};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    Plain { text: String, emoji: bool },
    #[serde(rename = "mrkdwn")]
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into(), emoji: true }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Plain { text, .. } | Self::Mrkdwn { text } => text,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Button,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub action_id: String,
    pub text: TextObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ButtonElement {
    pub fn new(action_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Button,
            action_id: action_id.into(),
            text: TextObject::plain(label),
            style: None,
            value: None,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { block_id: String, text: TextObject },
    Section {
        block_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
    },
    Divider { block_id: String },
    Actions { block_id: String, elements: Vec<ButtonElement> },
    Context { block_id: String, elements: Vec<TextObject> },
}

impl Block {
    pub fn block_id(&self) -> &str {
        match self {
            Self::Header { block_id, .. }
            | Self::Section { block_id, .. }
            | Self::Divider { block_id }
            | Self::Actions { block_id, .. }
            | Self::Context { block_id, .. } => block_id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Ephemeral,
    InChannel,
}

/// A slash-command reply or a `response_url` follow-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResponseMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub replace_original: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub delete_original: bool,
}

impl ResponseMessage {
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.block_id() == block_id)
    }
}

pub struct MessageBuilder {
    message: ResponseMessage,
}

impl MessageBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message: ResponseMessage {
                response_type: None,
                text: text.into(),
                blocks: Vec::new(),
                replace_original: false,
                delete_original: false,
            },
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.message.response_type = Some(ResponseType::Ephemeral);
        self
    }

    pub fn in_channel(mut self) -> Self {
        self.message.response_type = Some(ResponseType::InChannel);
        self
    }

    pub fn replace_original(mut self) -> Self {
        self.message.replace_original = true;
        self
    }

    pub fn delete_original(mut self) -> Self {
        self.message.delete_original = true;
        self
    }

    pub fn header(mut self, block_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.message
            .blocks
            .push(Block::Header { block_id: block_id.into(), text: TextObject::plain(text) });
        self
    }

    pub fn section<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut SectionBuilder),
    {
        let mut builder = SectionBuilder::default();
        build(&mut builder);
        self.message.blocks.push(Block::Section {
            block_id: block_id.into(),
            text: builder.text,
            fields: builder.fields,
        });
        self
    }

    pub fn divider(mut self, block_id: impl Into<String>) -> Self {
        self.message.blocks.push(Block::Divider { block_id: block_id.into() });
        self
    }

    pub fn actions<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ActionsBuilder),
    {
        let mut builder = ActionsBuilder::default();
        build(&mut builder);
        self.message
            .blocks
            .push(Block::Actions { block_id: block_id.into(), elements: builder.elements });
        self
    }

    pub fn context<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ContextBuilder),
    {
        let mut builder = ContextBuilder::default();
        build(&mut builder);
        self.message
            .blocks
            .push(Block::Context { block_id: block_id.into(), elements: builder.elements });
        self
    }

    pub fn build(self) -> ResponseMessage {
        self.message
    }
}

#[derive(Default)]
pub struct SectionBuilder {
    text: Option<TextObject>,
    fields: Vec<TextObject>,
}

impl SectionBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::mrkdwn(text));
        self
    }

    pub fn field(&mut self, text: impl Into<String>) -> &mut Self {
        self.fields.push(TextObject::mrkdwn(text));
        self
    }
}

#[derive(Default)]
pub struct ActionsBuilder {
    elements: Vec<ButtonElement>,
}

impl ActionsBuilder {
    pub fn button(&mut self, button: ButtonElement) -> &mut Self {
        self.elements.push(button);
        self
    }
}

#[derive(Default)]
pub struct ContextBuilder {
    elements: Vec<TextObject>,
}

impl ContextBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::mrkdwn(text));
        self
    }
}

pub const TOP_SHARERS_SHOWN: u32 = 3;
pub const RECENT_SHOWN: u32 = 5;

/// Renders `1234567` as `1,234,567`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

fn with_author(text: &str, author: Option<&str>) -> String {
    match author {
        Some(author) => format!("{text}\n— {author}"),
        None => text.to_owned(),
    }
}

fn affirmation_blocks(
    builder: MessageBuilder,
    profile: &CommandProfile,
    text: &str,
    author: Option<&str>,
    user_name: &str,
    total_shared: i64,
) -> MessageBuilder {
    builder
        .section("affirmation.body.v1", |section| {
            section.mrkdwn(format!("✨ {}", with_author(text, author)));
        })
        .actions("affirmation.actions.v1", |actions| {
            actions
                .button(
                    ButtonElement::new(profile.shuffle_action_id, "🎲 Shuffle").value("shuffle"),
                )
                .button(
                    ButtonElement::new(profile.share_action_id, profile.share_label)
                        .style(ButtonStyle::Primary)
                        .value(text),
                );
        })
        .context("affirmation.context.v1", |context| {
            context.mrkdwn(format!(
                "Requested by @{user_name} • Total {} shared: {total_shared}",
                profile.noun_plural
            ));
        })
}

/// The private card with Shuffle and share buttons shown for a bare command.
pub fn affirmation_message(
    profile: &CommandProfile,
    text: &str,
    author: Option<&str>,
    user_name: &str,
    total_shared: i64,
) -> ResponseMessage {
    affirmation_blocks(
        MessageBuilder::new(text).ephemeral(),
        profile,
        text,
        author,
        user_name,
        total_shared,
    )
    .build()
}

pub fn shuffled_message(
    profile: &CommandProfile,
    text: &str,
    author: Option<&str>,
    user_name: &str,
    total_shared: i64,
) -> ResponseMessage {
    affirmation_blocks(
        MessageBuilder::new(format!("🎲 Shuffled! Here is a new {}.", profile.noun))
            .replace_original(),
        profile,
        text,
        author,
        user_name,
        total_shared,
    )
    .build()
}

/// Replaces the private card with a public post of the chosen text.
pub fn shared_message(
    profile: &CommandProfile,
    text: &str,
    user_id: &str,
    user_name: &str,
) -> ResponseMessage {
    MessageBuilder::new(format!("{user_name} {}: \"{text}\"", profile.noun_plural))
        .in_channel()
        .delete_original()
        .section("affirmation.shared.body.v1", |section| {
            section.mrkdwn(format!("_{text}_"));
        })
        .context("affirmation.shared.context.v1", |context| {
            context.mrkdwn(format!("{} {}", profile.share_context, mention(user_id)));
        })
        .build()
}

pub fn stats_message(
    profile: &CommandProfile,
    stats: &StatsSnapshot,
    user_name: &str,
) -> ResponseMessage {
    let title = format!("📊 {} Statistics", profile.title);
    let total_shared = format_count(stats.total_shared);
    let total_available = format_count(stats.total_available);

    let mut builder = MessageBuilder::new(format!(
        "{title}\nTotal Shared: {total_shared}\nAvailable {}: {total_available}",
        profile.title
    ))
    .ephemeral()
    .header("stats.header.v1", title.clone())
    .section("stats.totals.v1", |section| {
        section
            .field(format!(
                "*Total {} Shared:* :chart_with_upwards_trend:\n`{total_shared}`",
                profile.title
            ))
            .field(format!(
                "*Available {}:* {}\n`{total_available}`",
                profile.title, profile.emoji
            ));
    });

    if !stats.top_sharers.is_empty() {
        let ranking = stats
            .top_sharers
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                format!(
                    "{}. {} — {} {}",
                    index + 1,
                    mention(&entry.user_id),
                    format_count(entry.count),
                    profile.noun_plural
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        builder = builder.section("stats.top_sharers.v1", |section| {
            section.mrkdwn(format!(
                "*Top {} {} Contributors: :trophy:*\n{ranking}",
                stats.top_sharers.len(),
                profile.noun_title()
            ));
        });
    }

    if !stats.recent.is_empty() {
        let heading = format!("*Last {} Added {}:* :new:", stats.recent.len(), profile.title);
        builder = builder.divider("stats.recent.divider.v1");
        builder = builder.section("stats.recent.v1", |section| {
            section.mrkdwn(heading);
        });
        for (index, affirmation) in stats.recent.iter().enumerate() {
            builder = builder.section(format!("stats.recent.{}.v1", index + 1), |section| {
                section.mrkdwn(recent_line(index, affirmation));
            });
        }
    }

    builder
        .section("stats.instructions.v1", |section| {
            section.mrkdwn(format!(
                ":bulb: *To add a new {}, use:* `{} add \"Quote here\"`",
                profile.noun, profile.command
            ));
        })
        .context("stats.context.v1", |context| {
            context.mrkdwn(format!("Requested by @{user_name}"));
        })
        .build()
}

fn recent_line(index: usize, affirmation: &Affirmation) -> String {
    let recorded_by = if affirmation.added_by_system() {
        "system".to_owned()
    } else {
        mention(&affirmation.added_by_id)
    };
    let attribution =
        affirmation.author.as_deref().map(|author| format!(" ({author})")).unwrap_or_default();
    format!("{}. _{}_{attribution}  —  recorded by {recorded_by}", index + 1, affirmation.text)
}

pub fn usage_message(profile: &CommandProfile) -> ResponseMessage {
    MessageBuilder::new(format!(
        "🤖 To add a new {}, please use the format:\n{}\n\nExample: `{} add \"TG is absolutely amazing!\" \"Jane Doe\"`",
        profile.noun,
        profile.add_usage(),
        profile.command
    ))
    .ephemeral()
    .build()
}

pub fn help_message(profile: &CommandProfile) -> ResponseMessage {
    let command = profile.command;
    MessageBuilder::new(format!("{} command help", profile.title))
        .ephemeral()
        .section("help.summary.v1", |section| {
            section.mrkdwn(format!(
                "*Available commands*\n• `{command}` get a random {noun}\n• `{command} add \"Quote\" \"Author\"` add a {noun}\n• `{command} stats` show statistics\n• `{command} new` show the add format\n• `{command} help` show this message",
                noun = profile.noun
            ));
        })
        .build()
}

pub fn added_message(profile: &CommandProfile, submission: &Submission) -> ResponseMessage {
    let attribution =
        submission.author.as_deref().map(|author| format!("\n>— {author}")).unwrap_or_default();
    MessageBuilder::new(format!(
        "✅ Successfully added new {}!\n\n>{}{attribution}\n\n{}Thank you for contributing to the collection! ✨",
        profile.noun, submission.quote, profile.emoji
    ))
    .ephemeral()
    .build()
}

pub fn add_failed_message() -> ResponseMessage {
    MessageBuilder::new(
        "❌ Failed to add the quote. It might already exist in the database, or there was an error. Please try again.",
    )
    .ephemeral()
    .build()
}

pub fn too_long_message() -> ResponseMessage {
    MessageBuilder::new(format!(
        "🤖 Quote is too long. Please keep it under {MAX_QUOTE_CHARS} characters."
    ))
    .ephemeral()
    .build()
}

pub fn empty_submission_message(profile: &CommandProfile) -> ResponseMessage {
    MessageBuilder::new(format!(
        "🤖 That {} looks empty. Please use the format:\n{}",
        profile.noun,
        profile.add_usage()
    ))
    .ephemeral()
    .build()
}

pub fn error_message(profile: &CommandProfile, correlation_id: &str) -> ResponseMessage {
    let summary = format!(
        "🤖 Oops! Something went wrong getting your {}. Ray would say 'We're gonna get through this!' 💪",
        profile.noun
    );
    MessageBuilder::new(summary.clone())
        .ephemeral()
        .section("error.summary.v1", |section| {
            section.mrkdwn(summary);
        })
        .context("error.context.v1", |context| {
            context.plain(format!("Correlation ID: {correlation_id}"));
        })
        .build()
}
