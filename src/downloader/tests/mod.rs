use super::MediaDownloader;
use super::test_helpers::{
    Ending, ScriptedExtractor, create_test_downloader, sample_info, test_config,
    wait_for_terminal,
};
use crate::error::Error;
use crate::progress::RawProgress;
use crate::types::{
    DownloadOutcome, DownloadRequest, Event, MediaFormat, Quality, Status, TaskId,
};
use std::sync::atomic::Ordering;
use std::time::Duration;

mod query;
