//! Turns inbound chat events into replies, driving each user's session.

use crate::core::conversion::{self, ConversionResult, round_to};
use crate::core::currency::{Currency, RateError, RateSource, RateTable};
use crate::core::messages::Messages;
use crate::core::session::{SessionState, UserId};
use crate::store::memory::{MemorySessionStore, SessionGuard};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Buttons offered by the menu, identified by their callback payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Rate,
    Now,
    Convert,
    Subscribe,
    Unsubscribe,
}

impl Action {
    pub fn data(&self) -> &'static str {
        match self {
            Action::Rate => "rate",
            Action::Now => "now",
            Action::Convert => "convert",
            Action::Subscribe => "subscribe",
            Action::Unsubscribe => "unsubscribe",
        }
    }

    fn label(&self, messages: &Messages) -> &'static str {
        match self {
            Action::Rate => messages.button_rate,
            Action::Now => messages.button_now,
            Action::Convert => messages.button_convert,
            Action::Subscribe => messages.button_subscribe,
            Action::Unsubscribe => messages.button_unsubscribe,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data())
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rate" => Ok(Action::Rate),
            "now" => Ok(Action::Now),
            "convert" => Ok(Action::Convert),
            "subscribe" => Ok(Action::Subscribe),
            "unsubscribe" => Ok(Action::Unsubscribe),
            _ => Err(anyhow::anyhow!("Unknown action: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start { user: UserId },
    Button { user: UserId, action: Action },
    Text { user: UserId, text: String },
}

impl Event {
    pub fn user(&self) -> UserId {
        match self {
            Event::Start { user } | Event::Button { user, .. } | Event::Text { user, .. } => *user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Rows of inline buttons, only present on the menu.
    pub keyboard: Option<Vec<Vec<Button>>>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            keyboard: None,
        }
    }
}

pub struct Dispatcher {
    rates: Arc<dyn RateSource>,
    sessions: Arc<MemorySessionStore>,
    messages: &'static Messages,
}

impl Dispatcher {
    pub fn new(
        rates: Arc<dyn RateSource>,
        sessions: Arc<MemorySessionStore>,
        messages: &'static Messages,
    ) -> Self {
        Dispatcher {
            rates,
            sessions,
            messages,
        }
    }

    /// Handles one event to completion. `None` means the event gets no reply.
    ///
    /// The user's session stays locked for the whole call, including the rate
    /// fetch, so a second event from the same user waits for this one.
    #[instrument(skip(self), fields(user = event.user()))]
    pub async fn handle(&self, event: Event) -> Option<Reply> {
        let mut session = self.sessions.lock(event.user()).await;

        match event {
            Event::Start { .. } => Some(self.menu()),
            Event::Button { action, .. } => Some(self.on_button(action, &mut session).await),
            Event::Text { text, .. } => self.on_text(&text, &mut session).await,
        }
    }

    pub fn menu(&self) -> Reply {
        let button = |action: Action| Button {
            label: action.label(self.messages).to_string(),
            action,
        };

        Reply {
            text: self.messages.menu.to_string(),
            keyboard: Some(vec![
                vec![button(Action::Rate)],
                vec![button(Action::Now)],
                vec![button(Action::Convert)],
                vec![button(Action::Subscribe), button(Action::Unsubscribe)],
            ]),
        }
    }

    async fn on_button(&self, action: Action, session: &mut SessionGuard<'_>) -> Reply {
        debug!(%action, "Button pressed");
        match action {
            Action::Rate | Action::Now => match self.rates.fetch_rates().await {
                Ok(rates) => Reply::text(self.format_rates(&rates)),
                Err(e) => Reply::text(self.format_error(&e)),
            },
            Action::Convert => {
                session.set(SessionState::AwaitingAmount);
                Reply::text(self.messages.amount_prompt)
            }
            Action::Subscribe => Reply::text(self.messages.subscribed),
            Action::Unsubscribe => Reply::text(self.messages.unsubscribed),
        }
    }

    async fn on_text(&self, text: &str, session: &mut SessionGuard<'_>) -> Option<Reply> {
        if session.state() != SessionState::AwaitingAmount {
            debug!("Ignoring text outside of a conversion");
            return None;
        }

        let reply = self.convert_text(text).await;
        session.set(SessionState::Idle);
        Some(reply)
    }

    async fn convert_text(&self, text: &str) -> Reply {
        let amount = match conversion::parse_amount(text) {
            Ok(amount) => amount,
            Err(e) => {
                info!(error = %e, "Rejected amount");
                return Reply::text(self.messages.format_error);
            }
        };

        match self.rates.fetch_rates().await {
            Ok(rates) => {
                let result = conversion::convert(amount, &rates);
                Reply::text(self.format_conversion(&result))
            }
            Err(e) => Reply::text(self.format_error(&e)),
        }
    }

    fn format_rates(&self, rates: &RateTable) -> String {
        let today = chrono::Local::now().format(DATE_FORMAT).to_string();
        let mut lines = vec![self.messages.rates_header.replace("{date}", &today)];
        lines.extend(Currency::ALL.iter().map(|currency| {
            let rate = round_to(rates.rate_for(*currency), currency.rate_scale());
            format!("{currency}: {rate}")
        }));
        lines.join("\n")
    }

    fn format_conversion(&self, result: &ConversionResult) -> String {
        let amount = result.amount.normalize().to_string();
        let mut lines = vec![self.messages.conversion_header.replace("{amount}", &amount)];
        lines.extend(
            result
                .values
                .iter()
                .map(|v| format!("{}: {}", v.currency, v.value)),
        );
        lines.join("\n")
    }

    fn format_error(&self, error: &RateError) -> String {
        warn!(%error, "Could not fetch rates");
        match error {
            RateError::Fetch(cause) => self.messages.fetch_error.replace("{error}", cause),
            RateError::Provider => self.messages.provider_error.to_string(),
        }
    }
}
