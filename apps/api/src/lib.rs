//! # Kidlink API ライブラリ
//!
//! 公開 API サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app`: DI コンテナの構築とルーター定義
//! - `config`: 環境変数からの設定読み込み
//! - `error`: API エラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（セッション復元）
//! - `usecase`: ユースケース（ユーザー区分解決、メール通知）

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
