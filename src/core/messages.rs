//! User-facing reply texts for each supported locale

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

/// Template table for one locale.
///
/// `{date}`, `{amount}` and `{error}` are substituted by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub menu: &'static str,
    pub button_rate: &'static str,
    pub button_now: &'static str,
    pub button_convert: &'static str,
    pub button_subscribe: &'static str,
    pub button_unsubscribe: &'static str,
    pub rates_header: &'static str,
    pub conversion_header: &'static str,
    pub amount_prompt: &'static str,
    pub format_error: &'static str,
    pub fetch_error: &'static str,
    pub provider_error: &'static str,
    pub subscribed: &'static str,
    pub unsubscribed: &'static str,
}

const RU: Messages = Messages {
    menu: "Выбери действие:",
    button_rate: "💱 Курс валют",
    button_now: "🔁 Отправить курс сейчас",
    button_convert: "💱 Перевести сумму",
    button_subscribe: "✅ Подписаться",
    button_unsubscribe: "❌ Отписаться",
    rates_header: "💱 Курсы валют на {date} (за 1 гривну):",
    conversion_header: "💱 Перевод {amount} гривен:",
    amount_prompt: "💬 Введите сумму в гривнах, которую вы хотите перевести:",
    format_error: "❌ Введите сумму в виде числа, например: `1000`",
    fetch_error: "⚠️ Не удалось получить курс валют: {error}",
    provider_error: "⚠️ Не удалось получить курс валют: сервер вернул ошибку",
    subscribed: "🔔 Вы подписались на рассылку курса валют (функция пока в разработке).",
    unsubscribed: "🔕 Вы отписались от рассылки курса валют.",
};

const EN: Messages = Messages {
    menu: "Choose an action:",
    button_rate: "💱 Exchange rates",
    button_now: "🔁 Send rates now",
    button_convert: "💱 Convert amount",
    button_subscribe: "✅ Subscribe",
    button_unsubscribe: "❌ Unsubscribe",
    rates_header: "💱 Exchange rates for {date} (per 1 hryvnia):",
    conversion_header: "💱 Converting {amount} hryvnias:",
    amount_prompt: "💬 Enter the amount in hryvnias you want to convert:",
    format_error: "❌ Enter the amount as a number, for example: `1000`",
    fetch_error: "⚠️ Could not get exchange rates: {error}",
    provider_error: "⚠️ Could not get exchange rates: the server returned an error",
    subscribed: "🔔 You subscribed to exchange rate updates (this feature is still in development).",
    unsubscribed: "🔕 You unsubscribed from exchange rate updates.",
};

impl Messages {
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::Ru => &RU,
            Locale::En => &EN,
        }
    }
}
