use clap::Parser;
use philsan_qr::{cli, config, error, export, logging, preview, profile, render, source};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use philsan_qr_common::FieldLabels;
use profile::BulkProfile;
use source::{RecordLoader, RecordSource};
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Printed { input, output, scale } => {
            println!("🏷  philsan-qr - Printed版\n");
            let profile = BulkProfile::printed();

            println!("[1/2] データを読み込み中...");
            let record_source = RecordSource::for_profile(profile.source, &config, input, None, None)?;
            let mut loader = RecordLoader::new(record_source)
                .with_retries(config.load_retries, Duration::from_millis(500));
            let records = loader.load_or_empty().await;
            println!("✔ {}件のレコード\n", records.len());

            println!("[2/2] エクスポート中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let request = export::ExportRequest {
                format: cli::ExportFormat::Zip,
                output: &output_dir,
                title: "philsan_printed",
                pdf_quality: cli::PdfQuality::default(),
                raster_scale: scale.unwrap_or(config.raster_scale),
                show_progress: true,
            };
            export::export_records(&records, &profile, &request).await?;

            println!("\n✅ 完了");
        }

        Commands::Digital { bucket, object, input, output, format, title, pdf_quality, scale, retries } => {
            println!("🏷  philsan-qr - Digital版\n");
            let profile = BulkProfile::digital();

            println!("[1/2] データを取得中...");
            let record_source = RecordSource::for_profile(
                profile.source,
                &config,
                input,
                bucket.as_deref(),
                object.as_deref(),
            )?;
            let mut loader = RecordLoader::new(record_source)
                .with_retries(retries.unwrap_or(config.load_retries), Duration::from_millis(500));
            let records = loader.load_or_empty().await;
            println!("✔ {}件のレコード\n", records.len());

            println!("[2/2] エクスポート中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let request = export::ExportRequest {
                format,
                output: &output_dir,
                title: &title,
                pdf_quality,
                raster_scale: scale.unwrap_or(config.raster_scale),
                show_progress: true,
            };
            export::export_records(&records, &profile, &request).await?;

            println!("\n✅ 完了");
        }

        Commands::Preview { name, email, affiliation, output, interactive } => {
            println!("🔍 philsan-qr - プレビュー\n");
            let rasterizer = render::ResvgRasterizer::new(config.raster_scale);
            let mut form = preview::PreviewForm::new(FieldLabels::AFFILIATION);

            if let Some(name) = name {
                form.set_name(name);
            }
            if let Some(email) = email {
                form.set_email(email);
            }
            if let Some(affiliation) = affiliation {
                form.set_affiliation(affiliation);
            }

            if interactive {
                form.run_interactive(&rasterizer, &output)?;
            } else if form.save_png(&rasterizer, &output)? {
                println!("✔ プレビュー出力: {}", output.display());
            } else {
                println!("メールアドレスが未入力のためカードは生成されません");
            }
        }

        Commands::Config { set_storage_url, set_storage_key, show } => {
            let mut config = config;

            if set_storage_url.is_some() || set_storage_key.is_some() {
                config.set_storage(set_storage_url, set_storage_key)?;
                println!("✔ ストレージ設定を保存しました");
            }

            if show {
                println!("設定:");
                println!("  ストレージURL: {}", config.storage_url.as_deref().unwrap_or("(未設定)"));
                println!("  ストレージキー: {}", config.masked_key());
                println!("  バケット: {}/{}", config.bucket, config.object);
                println!("  静的データ: {}", config.static_data_path.display());
                println!("  画像化倍率: {}", config.raster_scale);
                println!("  再試行回数: {}", config.load_retries);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}
