mod frame_records;
mod sessions;
