use tokio::runtime::{Builder, Runtime};

/// Worker pool every probe and download runs on.
pub fn build_pool(worker_threads: usize) -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(worker_threads.max(1))
        .thread_name("hubmirror-worker")
        .enable_all()
        .build()
}
