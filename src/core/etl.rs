use crate::core::Pipeline;
use crate::domain::model::LadderRun;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<LadderRun> {
        tracing::info!("Starting ladder ETL process...");
        self.monitor.log_stage("Start");

        // Extract
        tracing::info!("📥 Extracting results feed...");
        let raw = self.pipeline.extract().await?;
        tracing::info!("Extracted {} bytes", raw.len());
        self.monitor.log_stage("Extract");

        // Transform
        tracing::info!("🔄 Computing ladder...");
        let result = self.pipeline.transform(raw).await?;
        tracing::info!(
            "Ranked {} teams from {} games",
            result.ladder.len(),
            result.game_count
        );
        self.monitor.log_stage("Transform");

        // Load
        tracing::info!("💾 Writing outputs...");
        let outputs = self.pipeline.load(&result).await?;
        for path in &outputs {
            tracing::info!("Output saved to: {}", path);
        }
        self.monitor.log_stage("Load");
        self.monitor.log_final_stats();

        Ok(LadderRun {
            ladder: result.ladder,
            outputs,
        })
    }
}
