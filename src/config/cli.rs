use crate::domain::ports::Storage;
use crate::utils::error::{Result, SolarError};
use std::fs;
use std::path::Path;

/// Output files relative to `base_path`; absolute targets are written as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    /// 相對路徑以工作目錄為準
    pub fn current_dir() -> Self {
        Self::new(String::new())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!("📁 Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path.display().to_string())
    }
}

/// 記錄錯誤並依嚴重程度結束程序
pub fn exit_with_error(error: &anyhow::Error) -> ! {
    match error.downcast_ref::<SolarError>() {
        Some(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                error,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            // 失敗一律非零
            std::process::exit(e.severity().exit_code().max(1));
        }
        None => {
            tracing::error!("❌ {:#}", error);
            eprintln!("❌ {:#}", error);
            std::process::exit(1);
        }
    }
}
