//! Prompt templates for the model-backed tools

use minijinja::Environment;
use serde::Serialize;

const NEWS: &str = "news";
const MARKET_TREND: &str = "market_trend";
const SENTIMENT: &str = "sentiment";
const ADVISOR: &str = "advisor";

const NEWS_TEMPLATE: &str = r"
You are a financial expert and news analyst. Here's a query: {{ query }}
The following are the latest articles related to the query:
{{ results }}

Based on these articles, provide a detailed analysis of the current news trends, potential impacts, and any key takeaways.
";

const MARKET_TREND_TEMPLATE: &str = r"
You are a financial expert and market analyst. Here is a search query: {{ query }}
The following are some search results related to this market trend query:

{{ results }}

Based on these search results, provide a detailed analysis of the stock's current market trend, the key drivers, and potential future outlook.
";

const SENTIMENT_TEMPLATE: &str = r"
You are a financial sentiment analyst.

Analyze the sentiment of the following financial news or stock-related text and classify it as:
- Positive
- Negative
- Neutral

Also provide a one-line explanation for your sentiment classification.

Text:
{{ text }}

Respond in the following format:
Sentiment: <Positive|Negative|Neutral>
Reason: <Short explanation>
";

const ADVISOR_TEMPLATE: &str = r"
You are a financial advisor. Based on the following data and news for the stock symbol {{ symbol }}, provide concise financial advice.

Stock Data (last month): {{ stock_data }}

Recent News: {{ news }}

Recent News Sentiment: {{ sentiment }}

Your advice should consider the stock's recent performance, sentiment, and any upcoming market trends.
";

/// Compiled prompt templates
pub struct Prompts {
    env: Environment<'static>,
}

#[derive(Serialize)]
struct SearchContext<'a> {
    query: &'a str,
    results: &'a str,
}

#[derive(Serialize)]
struct SentimentContext<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct AdvisorContext<'a> {
    symbol: &'a str,
    stock_data: &'a str,
    news: &'a str,
    sentiment: &'a str,
}

impl Prompts {
    /// Compile all templates
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(NEWS, NEWS_TEMPLATE)?;
        env.add_template(MARKET_TREND, MARKET_TREND_TEMPLATE)?;
        env.add_template(SENTIMENT, SENTIMENT_TEMPLATE)?;
        env.add_template(ADVISOR, ADVISOR_TEMPLATE)?;
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: impl Serialize) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// News summarization prompt
    pub fn news(&self, query: &str, results: &str) -> Result<String, minijinja::Error> {
        self.render(NEWS, SearchContext { query, results })
    }

    /// Market trend analysis prompt
    pub fn market_trend(&self, query: &str, results: &str) -> Result<String, minijinja::Error> {
        self.render(MARKET_TREND, SearchContext { query, results })
    }

    /// Sentiment classification prompt
    pub fn sentiment(&self, text: &str) -> Result<String, minijinja::Error> {
        self.render(SENTIMENT, SentimentContext { text })
    }

    /// Financial advice prompt
    pub fn advisor(
        &self,
        symbol: &str,
        stock_data: &str,
        news: &str,
        sentiment: &str,
    ) -> Result<String, minijinja::Error> {
        self.render(
            ADVISOR,
            AdvisorContext {
                symbol,
                stock_data,
                news,
                sentiment,
            },
        )
    }
}
