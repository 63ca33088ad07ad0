//! Builds quote providers from configuration.

use journal_config::{EndpointSettings, QuoteSettings};
use journal_core::error::QuoteError;
use journal_core::traits::QuoteProvider;
use journal_quotes::{
    EastmoneyClient, HttpOptions, PriceResolver, StockDirectory, TencentClient, YahooClient,
    EASTMONEY_REFERER,
};
use std::time::Duration;

fn options(settings: &QuoteSettings, endpoint: &EndpointSettings) -> HttpOptions {
    HttpOptions::new(Duration::from_secs(endpoint.timeout_secs)).with_user_agent(&settings.user_agent)
}

fn eastmoney(settings: &QuoteSettings, endpoint: &EndpointSettings) -> Result<EastmoneyClient, QuoteError> {
    let options = options(settings, endpoint).with_referer(EASTMONEY_REFERER);
    Ok(EastmoneyClient::new(&options)?
        .with_urls(&settings.eastmoney_kline.url, &settings.eastmoney_info.url))
}

fn tencent(settings: &QuoteSettings) -> Result<TencentClient, QuoteError> {
    Ok(TencentClient::new(&options(settings, &settings.tencent))?.with_url(&settings.tencent.url))
}

fn yahoo(settings: &QuoteSettings) -> Result<YahooClient, QuoteError> {
    Ok(YahooClient::new(&options(settings, &settings.yahoo))?.with_url(&settings.yahoo.url))
}

/// Eastmoney, then Tencent, then Yahoo with throttling back-off.
pub fn price_resolver(settings: &QuoteSettings) -> Result<PriceResolver, QuoteError> {
    Ok(PriceResolver::new()
        .with_provider(eastmoney(settings, &settings.eastmoney_kline)?)
        .with_provider(tencent(settings)?)
        .with_retrying_provider(yahoo(settings)?, settings.retry))
}

/// Eastmoney info, then Tencent names.
pub fn stock_directory(settings: &QuoteSettings) -> Result<StockDirectory, QuoteError> {
    Ok(StockDirectory::new()
        .with_provider(eastmoney(settings, &settings.eastmoney_info)?)
        .with_provider(tencent(settings)?))
}

/// Every bar provider on its own, for probing.
pub fn bar_providers(settings: &QuoteSettings) -> Result<Vec<Box<dyn QuoteProvider>>, QuoteError> {
    Ok(vec![
        Box::new(eastmoney(settings, &settings.eastmoney_kline)?),
        Box::new(tencent(settings)?),
        Box::new(yahoo(settings)?),
    ])
}
