/*
 * Responsibility
 * - tokio runtime 起動
 * - app::run() の呼び出しのみ (設定読み込み・依存生成・Router 組み立ては app 側)
 * - 起動失敗は anyhow でまとめて返す
 */
mod api;
mod app;
mod config;
mod error;
mod middleware;
mod repos;
mod services;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
