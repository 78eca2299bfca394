use std::io::Cursor;

use batch_adapters::{logging_processor, market_data_reader, MarketData};
use batch_core::{CollectingSink, EventRecordingListener, EventStore, InMemoryEventStore, ItemError, LoggingListener,
                 Step, StepBuilder, StepError, StepEventKind};

fn csv(lines: &[&str]) -> Cursor<Vec<u8>> {
    let mut text = String::from("TID,TickerName,TickerDescription\n");
    for l in lines {
        text.push_str(l);
        text.push('\n');
    }
    Cursor::new(text.into_bytes())
}

fn valid_lines(n: u64) -> Vec<String> {
    (1..=n).map(|i| format!("{i},TCK{i},Ticker number {i}")).collect()
}

#[test]
fn ten_lines_with_chunk_four_commit_four_four_two() {
    let lines = valid_lines(10);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let sink = CollectingSink::new();
    let mut step = StepBuilder::new("step_first").chunk(4)
                                                 .reader(market_data_reader(csv(&refs)))
                                                 .stage(logging_processor("ItemProcessor1"))
                                                 .stage(logging_processor("ItemProcessor2"))
                                                 .writer(sink.clone())
                                                 .listener(LoggingListener::new())
                                                 .build()
                                                 .expect("step");
    let result = step.execute();
    assert!(result.is_completed());
    assert_eq!(sink.chunk_sizes(), vec![4, 4, 2]);
    let tids: Vec<u64> = sink.records().iter().map(|m| m.tid).collect();
    assert_eq!(tids, (1..=10).collect::<Vec<_>>());
    assert_eq!(result.stats.read_count, 10);
}

#[test]
fn malformed_third_line_is_skipped_once() {
    let mut lines = valid_lines(10);
    lines[2] = "3,BROKEN".to_string();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let store = InMemoryEventStore::new();
    let sink = CollectingSink::<MarketData>::new();
    let mut step = StepBuilder::new("step_first").chunk(4)
                                                 .reader(market_data_reader(csv(&refs)))
                                                 .writer(sink.clone())
                                                 .listener(EventRecordingListener::new(store.clone()))
                                                 .build()
                                                 .expect("step");
    let result = step.execute();
    assert!(result.is_completed());
    assert_eq!(result.skipped(), 1);
    assert_eq!(sink.chunk_sizes(), vec![4, 4, 1]);
    assert!(sink.records().iter().all(|m| m.tid != 3));

    let skipped: Vec<ItemError> = store.list(result.execution_id)
                                       .into_iter()
                                       .filter_map(|e| match e.kind {
                                           StepEventKind::SkippedInRead { error } => Some(error),
                                           _ => None,
                                       })
                                       .collect();
    // línea 4 del archivo: la cabecera es la línea 1
    assert_eq!(skipped, vec![ItemError::parse(4, "3,BROKEN", "expected 3 fields, found 2")]);
}

#[test]
fn sixth_malformed_line_exceeds_skip_limit() {
    let lines: Vec<String> = (1..=10).map(|i| if i % 2 == 0 || i == 9 { format!("x{i},BAD,Line") } else { format!("{i},OK,Line") })
                                     .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let sink = CollectingSink::<MarketData>::new();
    let mut step = StepBuilder::new("step_first").chunk(4)
                                                 .skip_limit(5)
                                                 .reader(market_data_reader(csv(&refs)))
                                                 .writer(sink.clone())
                                                 .build()
                                                 .expect("step");
    let result = step.execute();
    match result.error() {
        Some(StepError::SkipLimitExceeded { limit, cause }) => {
            assert_eq!(*limit, 5);
            assert_eq!(cause.input(), Some("x10,BAD,Line"));
        }
        other => panic!("expected skip limit failure, got {other:?}"),
    }
    assert_eq!(result.stats.read_skip_count, 5);
    // los chunks commiteados antes del fallo se conservan
    assert_eq!(sink.chunk_sizes(), vec![4]);
}

#[test]
fn quoted_descriptions_keep_embedded_delimiters() {
    let sink = CollectingSink::<MarketData>::new();
    let mut step = StepBuilder::new("quoted").reader(market_data_reader(csv(&[r#"1,GLBX,"Globex, Inc.""#])))
                                             .writer(sink.clone())
                                             .build()
                                             .expect("step");
    assert!(step.execute().is_completed());
    assert_eq!(sink.records()[0].ticker_description, "Globex, Inc.");
}

#[test]
fn undecodable_header_does_not_consume_skip_budget() {
    let mut bytes = b"TID,Ticker\xff,TickerDescription\n".to_vec();
    bytes.extend_from_slice(b"1,A,Alpha\n2,B,Beta\n");
    let sink = CollectingSink::<MarketData>::new();
    let mut step = StepBuilder::new("step_first").skip_limit(0)
                                                 .reader(market_data_reader(Cursor::new(bytes)))
                                                 .writer(sink.clone())
                                                 .build()
                                                 .expect("step");
    let result = step.execute();
    assert!(result.is_completed());
    assert_eq!(result.stats.read_skip_count, 0);
    assert_eq!(sink.records().len(), 2);
}
