use anyhow::Result;
use pulse::batching::{Admission, BatchConfig, BatchWorker, OutgoingMessage};
use pulse::pool::BuffersPool;
use pulse_std::compression::CompressionType;
use pulse_std::errors::PulseError;
use pulse_tests::*;
use std::collections::HashSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn producers_feed_a_shared_worker() -> Result<()> {
    let config = BatchConfig::default()
        .max_messages(50)
        .compression(CompressionType::Lz4);
    let handle = BatchWorker::spawn(builder(config, BuffersPool::unpooled())?);

    let producers: Vec<_> = (0..4u64)
        .map(|producer| {
            let handle = handle.clone();
            tokio::spawn(async move {
                let mut batches = Vec::new();

                for i in 0..100u64 {
                    let sequence_id = producer * 1000 + i;
                    let mut message = OutgoingMessage::new(sequence_id, sentence(), Ack(sequence_id));

                    loop {
                        if handle.is_full().await? {
                            batches.extend(handle.flush().await?);
                        }

                        match handle.add(message).await? {
                            Admission::Accepted => break,
                            Admission::Rejected(rejected) => {
                                batches.extend(handle.flush().await?);
                                message = rejected;
                            }
                        }
                    }
                }

                Ok::<_, PulseError>(batches)
            })
        })
        .collect();

    let mut batches = Vec::new();
    for producer in producers {
        batches.extend(producer.await??);
    }
    batches.extend(handle.flush().await?);

    let mut acks = HashSet::new();
    for batch in batches {
        let decoded = decode(batch)?;
        assert!(decoded.messages.len() <= 50 + 4);
        assert_eq!(decoded.messages.len(), decoded.callbacks.len());
        acks.extend(decoded.callbacks);
    }

    assert_eq!(acks.len(), 400);
    handle.close().await?;

    Ok(())
}

#[tokio::test]
async fn worker_stops_when_closed() -> Result<()> {
    let handle = BatchWorker::spawn(builder(BatchConfig::default(), BuffersPool::unpooled())?);
    handle
        .add(OutgoingMessage::new(1, sentence(), Ack(1)))
        .await?;

    let batch = handle.flush().await?.expect("one message was staged");
    assert_eq!(decode(batch)?.callbacks, vec![Ack(1)]);

    handle.close().await?;

    assert!(matches!(handle.flush().await, Err(PulseError::WorkerClosed)));

    Ok(())
}
