use ironcsv::row::{RowDecoder, row2};
use ironcsv::testing::{MockRowReader, MockRowWriter, TempDirPath};
use ironcsv::{
    CsvFormat, CsvRowReader, CsvRowWriter, CsvSink, CsvSource, DecodeError, FailureCollector,
    FailureMode, RowCodec, cell,
};

fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn sink_then_source_round_trips_string_rows() -> anyhow::Result<()> {
    init_tracing();
    let rows = strings(&[&["1", "a"], &["2", "b"]]);
    let codec = RowCodec::list(cell::string(), 0);
    let format = CsvFormat::default();
    let dir = TempDirPath::new()?;
    let path = dir.file_path("rows.csv");

    let writer = CsvRowWriter::new(std::fs::File::create(&path)?, &format)?;
    let mut sink = CsvSink::open(writer, Vec::<String>::new(), codec.clone())?;
    sink.write_all(&rows)?;
    sink.close()?;
    assert_eq!(std::fs::read_to_string(&path)?, "1,a\n2,b\n");

    let input = std::fs::File::open(&path)?;
    let back = CsvSource::from_reader(input, &format, codec)?.collect_fail_fast()?;
    assert_eq!(back, rows);
    Ok(())
}

#[test]
fn abandoning_source_after_first_row_closes_reader_once() {
    let reader = MockRowReader::new([["1"], ["2"], ["3"]]);
    let tracker = reader.tracker();
    let mut source = CsvSource::new(reader, false, cell::i32());

    assert_eq!(source.next().unwrap().unwrap(), Ok(1));
    assert_eq!(tracker.close_count(), 0);
    drop(source);

    assert_eq!(tracker.close_count(), 1);
    assert_eq!(tracker.pull_count(), 1);
}

#[test]
fn exhaustion_closes_once_and_fuses() {
    let reader = MockRowReader::new([["1"]]);
    let tracker = reader.tracker();
    let mut source = CsvSource::new(reader, false, cell::i32());

    assert!(source.next().is_some());
    assert!(source.next().is_none());
    assert!(source.is_closed());
    assert!(source.next().is_none());
    source.close().unwrap();
    drop(source);

    assert_eq!(tracker.close_count(), 1);
    assert_eq!(tracker.pull_count(), 2);
}

#[test]
fn unpulled_source_still_releases_its_reader() {
    let reader = MockRowReader::new([["1"]]);
    let tracker = reader.tracker();
    drop(CsvSource::new(reader, false, cell::i32()));
    assert_eq!(tracker.close_count(), 1);
    assert_eq!(tracker.pull_count(), 0);
}

#[test]
fn failing_row_does_not_abort_the_stream() -> anyhow::Result<()> {
    let reader = MockRowReader::new([["1"], ["x"], ["3"]]);
    let source = CsvSource::new(reader, false, cell::i32());

    let results = source.collect_results()?;
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], Ok(1));
    let err = results[1].clone().unwrap_err();
    assert_eq!(err.column(), Some(0));
    assert!(matches!(err.root_cause(), DecodeError::Parse { target: "i32", .. }));
    assert_eq!(results[2], Ok(3));
    Ok(())
}

#[test]
fn counters_track_rows_and_failures() {
    let mut source = CsvSource::new(MockRowReader::new([["1"], ["x"], ["y"]]), false, cell::u8());
    while source.next().is_some() {}
    assert_eq!(source.rows_read(), 3);
    assert_eq!(source.failures(), 2);
}

#[test]
fn header_row_is_skipped() -> anyhow::Result<()> {
    let reader = MockRowReader::new([["id", "name"], ["1", "a"]]);
    let source = CsvSource::new(reader, true, row2(cell::u32(), cell::string()));
    assert_eq!(source.collect_fail_fast()?, vec![(1, "a".to_string())]);
    Ok(())
}

#[test]
fn header_only_input_yields_nothing() -> anyhow::Result<()> {
    let reader = MockRowReader::new([["id"]]);
    let tracker = reader.tracker();
    let source = CsvSource::new(reader, true, cell::u32());
    assert!(source.collect_results()?.is_empty());
    assert_eq!(tracker.close_count(), 1);
    Ok(())
}

#[test]
fn read_fault_is_yielded_once_and_releases_reader() {
    let reader = MockRowReader::new([["1"], ["2"], ["3"]]).fail_at(1);
    let tracker = reader.tracker();
    let mut source = CsvSource::new(reader, false, cell::i32());

    assert_eq!(source.next().unwrap().unwrap(), Ok(1));
    let err = source.next().unwrap().unwrap_err();
    assert!(format!("{err:#}").contains("injected read fault"));
    assert_eq!(tracker.close_count(), 1);
    assert!(source.next().is_none());
    drop(source);
    assert_eq!(tracker.close_count(), 1);
}

#[test]
fn fail_fast_reports_row_number() {
    let reader = MockRowReader::new([["1"], ["2"], ["nope"], ["4"]]);
    let tracker = reader.tracker();
    let err = CsvSource::new(reader, false, cell::i64())
        .collect_fail_fast()
        .unwrap_err();
    assert!(err.to_string().contains("row #3"));
    assert!(err.downcast_ref::<DecodeError>().is_some());
    assert_eq!(tracker.close_count(), 1);
}

#[test]
fn collect_and_skip_modes_drop_failing_rows() -> anyhow::Result<()> {
    let rows = [["1"], ["x"], ["3"], [""]];

    let mut collector = FailureCollector::new();
    let kept = CsvSource::new(MockRowReader::new(rows), false, cell::i32())
        .collect_with_mode(FailureMode::Collect, &mut collector)?;
    assert_eq!(kept, vec![1, 3]);
    let failed_rows: Vec<usize> = collector.errors().iter().map(|f| f.row).collect();
    assert_eq!(failed_rows, vec![2, 4]);

    let mut untouched = FailureCollector::new();
    let kept = CsvSource::new(MockRowReader::new(rows), false, cell::i32())
        .collect_with_mode(FailureMode::Skip, &mut untouched)?;
    assert_eq!(kept, vec![1, 3]);
    assert!(untouched.is_empty());
    Ok(())
}

#[test]
fn sink_writes_header_first_and_closes_once() -> anyhow::Result<()> {
    let writer = MockRowWriter::new();
    let tracker = writer.tracker();
    let codec = row2(cell::i32(), cell::option(cell::string()));

    let mut sink = CsvSink::open(writer, ["n", "label"], codec)?;
    sink.write(&(1, Some("one".to_string())))?;
    sink.write(&(2, None))?;
    assert_eq!(sink.rows_written(), 2);
    sink.close()?;
    sink.close()?;
    drop(sink);

    assert_eq!(
        tracker.rows(),
        strings(&[&["n", "label"], &["1", "one"], &["2", ""]])
    );
    assert_eq!(tracker.close_count(), 1);
    Ok(())
}

#[test]
fn empty_header_is_not_written() -> anyhow::Result<()> {
    let writer = MockRowWriter::new();
    let tracker = writer.tracker();
    let written = CsvSink::open(writer, Vec::<String>::new(), cell::u8())?
        .scoped(|sink| sink.write_all(&[7, 8]))?;
    assert_eq!(written, 2);
    assert_eq!(tracker.rows(), strings(&[&["7"], &["8"]]));
    Ok(())
}

#[test]
fn dropped_sink_is_closed() -> anyhow::Result<()> {
    let writer = MockRowWriter::new();
    let tracker = writer.tracker();
    {
        let mut sink = CsvSink::open(writer, ["v"], cell::bool())?;
        sink.write(&true)?;
    }
    assert_eq!(tracker.close_count(), 1);
    assert_eq!(tracker.rows(), strings(&[&["v"], &["true"]]));
    Ok(())
}

#[test]
fn write_fault_releases_writer_and_rejects_later_writes() -> anyhow::Result<()> {
    let writer = MockRowWriter::new().fail_at(2);
    let tracker = writer.tracker();
    let mut sink = CsvSink::open(writer, ["v"], cell::i32())?;

    sink.write(&1)?;
    let err = sink.write(&2).unwrap_err();
    assert!(format!("{err:#}").contains("injected write fault"));
    assert!(sink.is_closed());
    assert_eq!(tracker.close_count(), 1);

    let late = sink.write(&3).unwrap_err();
    assert!(late.root_cause().to_string().contains("closed"));
    drop(sink);
    assert_eq!(tracker.close_count(), 1);
    assert_eq!(tracker.rows().len(), 2);
    Ok(())
}

#[test]
fn scoped_body_error_still_closes() {
    let writer = MockRowWriter::new();
    let tracker = writer.tracker();
    let result: anyhow::Result<()> = CsvSink::open(writer, ["v"], cell::i32())
        .and_then(|sink| {
            sink.scoped(|sink| {
                sink.write(&1)?;
                anyhow::bail!("stop here")
            })
        });
    assert_eq!(result.unwrap_err().to_string(), "stop here");
    assert_eq!(tracker.close_count(), 1);
    assert_eq!(tracker.rows().len(), 2);
}

#[test]
fn header_fault_releases_writer() {
    let writer = MockRowWriter::new().fail_at(0);
    let tracker = writer.tracker();
    assert!(CsvSink::open(writer, ["v"], cell::i32()).is_err());
    assert_eq!(tracker.close_count(), 1);
}

#[test]
fn file_round_trip_with_header_and_tabs() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("nested/dir/pairs.tsv");
    let format = CsvFormat::tsv().has_header(true);
    let codec = row2(cell::string(), cell::i64());
    let data = vec![("tab\there".to_string(), -5), ("plain".to_string(), 9)];

    let written = CsvSink::create(&path, &format, ["key", "value"], codec.clone())?
        .scoped(|sink| sink.write_all(&data))?;
    assert_eq!(written, 2);

    let source = CsvSource::from_path(&path, &format, codec)?;
    assert_eq!(source.collect_fail_fast()?, data);
    Ok(())
}

#[test]
fn csv_reader_feeds_source_directly() -> anyhow::Result<()> {
    let text = "a;1\nb;x\n";
    let format = CsvFormat::new().delimiter(';');
    let reader = CsvRowReader::new(text.as_bytes(), &format)?;
    let codec = row2(cell::string(), cell::u8());
    let results = CsvSource::new(reader, false, codec.clone()).collect_results()?;
    assert_eq!(results[0], Ok(("a".to_string(), 1)));
    assert_eq!(results[1], codec.decode_row(&["b".to_string(), "x".to_string()]));
    assert!(results[1].is_err());
    Ok(())
}

#[test]
fn source_over_owned_buffer_drains_on_another_thread() -> anyhow::Result<()> {
    let input = std::io::Cursor::new(b"n\n1\n2\nx\n".to_vec());
    let format = CsvFormat::new().has_header(true);
    let source = CsvSource::from_reader(input, &format, cell::u16())?;

    let results = std::thread::spawn(move || source.collect_results())
        .join()
        .expect("reader thread panicked")?;
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], Ok(1));
    assert_eq!(results[1], Ok(2));
    assert!(results[2].is_err());
    Ok(())
}

#[test]
fn file_source_and_sink_move_across_threads() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("moved.csv.gz");
    let format = CsvFormat::default();

    let sink = CsvSink::create(&path, &format, ["v"], cell::i32())?;
    let written = std::thread::spawn(move || sink.scoped(|s| s.write_all(&[4, 5, 6])))
        .join()
        .expect("writer thread panicked")?;
    assert_eq!(written, 3);

    let source = CsvSource::from_path(&path, &format.has_header(true), cell::i32())?;
    let back = std::thread::spawn(move || source.collect_fail_fast())
        .join()
        .expect("reader thread panicked")?;
    assert_eq!(back, vec![4, 5, 6]);
    Ok(())
}

#[test]
fn mock_backed_sink_finishes_on_another_thread() -> anyhow::Result<()> {
    let writer = MockRowWriter::new();
    let tracker = writer.tracker();
    let sink = CsvSink::open(writer, ["v"], cell::bool())?;

    let written = std::thread::spawn(move || -> anyhow::Result<usize> {
        let mut sink = sink;
        sink.write(&true)?;
        sink.finish()
    })
    .join()
    .expect("writer thread panicked")?;
    assert_eq!(written, 1);
    assert_eq!(tracker.rows(), strings(&[&["v"], &["true"]]));
    assert_eq!(tracker.close_count(), 1);
    Ok(())
}

#[test]
fn zero_field_row_reads_back_as_one_empty_field() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("ragged.csv");
    let format = CsvFormat::default();
    let codec = RowCodec::list(cell::string(), 0);
    let rows = strings(&[&[], &["a"]]);

    CsvSink::create(&path, &format, Vec::<String>::new(), codec.clone())?
        .scoped(|sink| sink.write_all(&rows))?;
    assert_eq!(std::fs::read_to_string(&path)?, "\"\"\na\n");

    let back = CsvSource::from_path(&path, &format, codec)?.collect_fail_fast()?;
    assert_eq!(back, strings(&[&[""], &["a"]]));
    Ok(())
}
