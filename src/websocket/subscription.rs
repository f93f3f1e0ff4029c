//! Channel subscription and unsubscription operations.

use futures_util::SinkExt;
use tracing::{debug, info};
use tungstenite::Message;

use super::WsWriter;
use crate::Result;
use crate::auth::{Credentials, sign_subscription};
use crate::models::product::Product;
use crate::models::{Channel, ChannelSpec, SubscribeRequest, UnsubscribeRequest};
use crate::subscription::ProductSubscription;

/// Builds the channel list covering every declared product.
///
/// Tickers read `ticker` and trades read `matches`. Order books read
/// `level2` when `authenticated` and the public `level2_batch` otherwise;
/// both carry the same snapshot and update messages. With
/// `authenticated`, trade products also get the `user` channel, which
/// carries our own matches with the account id attached. Categories with
/// no products are left out.
///
/// Our own matches are also sent on `matches` without the account id, so
/// an authenticated trade stream sees each of them twice: once as a
/// public trade and once as an own fill with the same trade id.
pub fn channel_specs(subscription: &ProductSubscription, authenticated: bool) -> Vec<ChannelSpec> {
    let mut specs = Vec::new();

    let mut push = |channel: Channel, products: &[Product]| {
        if !products.is_empty() {
            specs.push(ChannelSpec::new(channel, products));
        }
    };

    let book_channel = if authenticated {
        Channel::Level2
    } else {
        Channel::Level2Batch
    };
    push(book_channel, subscription.order_book());
    push(Channel::Ticker, subscription.ticker());
    push(Channel::Matches, subscription.trades());
    if authenticated {
        push(Channel::User, subscription.trades());
    }

    specs
}

/// Sends a subscribe request for the given channels, signing it when
/// `credentials` are supplied.
///
/// # Errors
///
/// Returns a [`CambistError`](crate::CambistError) if signing or sending fails.
pub async fn subscribe(
    write: &mut WsWriter,
    channels: Vec<ChannelSpec>,
    credentials: Option<&Credentials>,
) -> Result<()> {
    let auth = credentials.map(sign_subscription).transpose()?;
    let names: Vec<String> = channels.iter().map(|c| c.name.clone()).collect();
    let request = SubscribeRequest::new(channels, auth);
    let json = serde_json::to_string(&request)?;
    debug!(authenticated = request.auth.is_some(), "Sending subscribe request");
    write.send(Message::Text(json.into())).await?;
    info!(?names, "Subscribed to channels");

    Ok(())
}

/// Subscribes to every channel the product subscription needs.
///
/// # Errors
///
/// Returns a [`CambistError`](crate::CambistError) if signing or sending fails.
pub async fn subscribe_all(
    write: &mut WsWriter,
    subscription: &ProductSubscription,
    credentials: Option<&Credentials>,
) -> Result<()> {
    let channels = channel_specs(subscription, credentials.is_some());
    subscribe(write, channels, credentials).await
}

/// Sends an unsubscribe request for the given channels.
///
/// # Errors
///
/// Returns a [`CambistError`](crate::CambistError) if sending the unsubscribe message fails.
pub async fn unsubscribe(write: &mut WsWriter, channels: Vec<ChannelSpec>) -> Result<()> {
    let names: Vec<String> = channels.iter().map(|c| c.name.clone()).collect();
    let request = UnsubscribeRequest::new(channels);
    let json = serde_json::to_string(&request)?;
    write.send(Message::Text(json.into())).await?;
    info!(?names, "Unsubscribed from channels");

    Ok(())
}
