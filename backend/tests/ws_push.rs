//! Live push delivery over a real WebSocket connection.

mod market_support;

use std::time::Duration;

use actix_web::{HttpServer, web};
use awc::ws::Frame;
use futures_util::{SinkExt, StreamExt};
use marketplace::domain::ports::CreatePurchaseRequest;
use marketplace::domain::UserId;
use marketplace::inbound::ws;
use marketplace::inbound::ws::state::WsState;
use market_support::{Market, api_app};
use serde_json::{Value, json};

const ORIGIN: &str = "http://localhost:3000";

async fn wait_until<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

#[actix_rt::test]
async fn sold_notification_is_pushed_to_the_connected_seller() {
    let market = Market::new();
    let seller = UserId::random();
    let item_id = market.list_item(seller, 7_500).await;

    let http_state = market.http_state.clone();
    let ws_state = WsState::new(market.registry.clone(), [ORIGIN]);
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    let server = HttpServer::new(move || {
        api_app(http_state.clone())
            .app_data(web::Data::new(ws_state.clone()))
            .service(ws::ws_entry)
    })
    .workers(1)
    .listen(listener)
    .expect("listen")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let client = awc::Client::default();
    let login = client
        .post(format!("http://{addr}/api/v1/login"))
        .send_json(&json!({ "token": format!("dev-token:{seller}") }))
        .await
        .expect("login request");
    let cookie = login
        .cookies()
        .expect("cookies parse")
        .iter()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .clone()
        .into_owned();

    let (_resp, mut socket) = client
        .ws(format!("http://{addr}/ws/notifications"))
        .set_header(awc::http::header::ORIGIN, ORIGIN)
        .cookie(cookie)
        .connect()
        .await
        .expect("websocket connect");
    wait_until(|| market.registry.lookup(&seller).is_some()).await;

    market
        .commands()
        .create_purchase(CreatePurchaseRequest {
            item_id,
            buyer_id: UserId::random(),
            payment_reference: None,
        })
        .await
        .expect("purchase");

    let text = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match socket.next().await.expect("stream open").expect("frame") {
                Frame::Text(bytes) => return bytes,
                Frame::Ping(payload) => {
                    socket
                        .send(awc::ws::Message::Pong(payload))
                        .await
                        .expect("pong");
                }
                _ => {}
            }
        }
    })
    .await
    .expect("push within timeout");

    let value: Value = serde_json::from_slice(&text).expect("json payload");
    assert_eq!(value["type"], "NOTIFICATION");
    assert_eq!(value["notification"]["kind"], "SOLD");
    assert_eq!(value["notification"]["relatedId"], item_id.to_string());

    socket
        .send(awc::ws::Message::Close(None))
        .await
        .expect("close");
    wait_until(|| market.registry.connected_count() == 0).await;
    handle.stop(false).await;
}
