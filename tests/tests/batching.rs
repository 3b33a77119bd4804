use anyhow::Result;
use bytes::Bytes;
use chrono::{Duration, Utc};
use pulse::batching::{Admission, BatchConfig, OutgoingMessage};
use pulse::pool::{BufferPool, BuffersPool};
use pulse_protocol::utils::add_single_message_to_batch;
use pulse_protocol::{Buffer, SingleMessageMetadata};
use pulse_std::compression::{CompressionType, Quality};
use pulse_tests::*;
use std::sync::Arc;

const CODECS: [CompressionType; 4] = [
    CompressionType::None,
    CompressionType::Lz4,
    CompressionType::Zlib,
    CompressionType::Zstd,
];

#[test]
fn every_codec_delivers_the_messages_it_was_given() -> Result<()> {
    for compression in CODECS {
        let config = BatchConfig::default().compression(compression);
        let mut builder = builder(config, BuffersPool::unpooled())?;
        let payloads: Vec<Bytes> = (0..50).map(|_| paragraph()).collect();

        for (sequence_id, payload) in payloads.iter().enumerate() {
            let sequence_id = sequence_id as u64 + 100;
            let metadata = SingleMessageMetadata::new().with_sequence_id(sequence_id);
            assert!(builder.add(metadata, sequence_id, payload, Ack(sequence_id), None, None));
        }

        let batch = decode(builder.flush()?.expect("batch should not be empty"))?;

        assert_eq!(batch.frame.metadata.compression, compression);
        assert_eq!(batch.frame.command.producer_id, PRODUCER_ID);
        assert_eq!(batch.frame.metadata.producer_name, PRODUCER_NAME);
        assert_eq!(batch.frame.command.sequence_id, 100);
        assert_eq!(batch.messages.len(), payloads.len());
        assert_eq!(batch.callbacks.first(), Some(&Ack(100)));
        assert_eq!(batch.callbacks.last(), Some(&Ack(149)));

        for (message, payload) in batch.messages.iter().zip(&payloads) {
            assert_eq!(&message.payload, payload);
        }

        builder.close()?;
    }

    Ok(())
}

#[test]
fn uncompressed_payload_matches_staged_entries() -> Result<()> {
    let mut builder = builder(BatchConfig::default(), BuffersPool::unpooled())?;
    let mut expected = Buffer::new();

    for sequence_id in 0..10 {
        let payload = sentence();
        let metadata = SingleMessageMetadata::new().with_property("index", sequence_id.to_string());
        add_single_message_to_batch(&mut expected, &metadata, &payload)?;
        builder.add(metadata, sequence_id, &payload, Ack(sequence_id), None, None);
    }

    let batch = decode(builder.flush()?.expect("batch should not be empty"))?;

    assert_eq!(&batch.frame.payload[..], expected.as_slice());
    assert_eq!(
        batch.frame.metadata.uncompressed_size as usize,
        expected.readable_bytes()
    );

    Ok(())
}

#[test]
fn producer_drains_into_several_batches() -> Result<()> {
    let config = BatchConfig::default()
        .max_messages(25)
        .compression(CompressionType::Zstd)
        .quality(Quality::Fastest);
    let mut builder = builder(config, BuffersPool::unpooled())?;
    let mut batches = Vec::new();

    for sequence_id in 0..110 {
        if builder.is_full() {
            batches.push(decode(builder.flush()?.expect("full batch"))?);
        }

        assert!(builder.add_payload(sequence_id, sentence(), Ack(sequence_id)));
    }

    if let Some(batch) = builder.flush()? {
        batches.push(decode(batch)?);
    }

    let sizes: Vec<usize> = batches.iter().map(|batch| batch.messages.len()).collect();
    assert_eq!(sizes, vec![25, 25, 25, 25, 10]);

    let first_ids: Vec<u64> = batches.iter().map(|batch| batch.frame.command.sequence_id).collect();
    assert_eq!(first_ids, vec![0, 25, 50, 75, 100]);

    let acks: Vec<Ack> = batches.into_iter().flat_map(|batch| batch.callbacks).collect();
    assert_eq!(acks, (0..110).map(Ack).collect::<Vec<_>>());

    Ok(())
}

#[test]
fn rejected_messages_lead_the_next_batch() -> Result<()> {
    let config = BatchConfig::default().max_batch_size(1024);
    let mut builder = builder(config, BuffersPool::unpooled())?;
    let mut pending = Some(OutgoingMessage::new(0, vec![1u8; 600], Ack(0)));
    let mut next_id = 1;
    let mut batches = Vec::new();

    while let Some(message) = pending.take() {
        match builder.try_add(message) {
            Admission::Accepted if next_id < 6 => {
                pending = Some(OutgoingMessage::new(next_id, vec![1u8; 600], Ack(next_id)));
                next_id += 1;
            }
            Admission::Accepted => {}
            Admission::Rejected(message) => {
                batches.push(decode(builder.flush()?.expect("rejection implies a batch"))?);
                pending = Some(message);
            }
        }
    }

    if let Some(batch) = builder.flush()? {
        batches.push(decode(batch)?);
    }

    assert_eq!(batches.len(), 6);
    for (expected, batch) in batches.iter().enumerate() {
        assert_eq!(batch.callbacks, vec![Ack(expected as u64)]);
    }

    Ok(())
}

#[test]
fn replicated_and_scheduled_messages_stay_in_their_own_batch() -> Result<()> {
    let mut builder = builder(BatchConfig::default(), BuffersPool::unpooled())?;
    let deliver_at = Utc::now() + Duration::seconds(30);

    let replicated = OutgoingMessage::new(1, sentence(), Ack(1))
        .replicate_to(["us-east", "eu-west"])
        .deliver_at(deliver_at);
    assert!(builder.try_add(replicated).is_accepted());
    assert!(!builder.add_payload(2, sentence(), Ack(2)));

    let first = decode(builder.flush()?.expect("replicated batch"))?;
    assert_eq!(first.frame.metadata.replicate_to, vec!["us-east", "eu-west"]);
    assert_eq!(
        first.frame.metadata.deliver_at_time,
        Some(deliver_at.timestamp_millis())
    );

    assert!(builder.add_payload(2, sentence(), Ack(2)));
    assert!(builder.add_payload(3, sentence(), Ack(3)));

    let second = decode(builder.flush()?.expect("plain batch"))?;
    assert!(second.frame.metadata.replicate_to.is_empty());
    assert_eq!(second.frame.metadata.deliver_at_time, None);
    assert_eq!(second.callbacks, vec![Ack(2), Ack(3)]);

    Ok(())
}

#[test]
fn flushed_buffers_are_recycled_through_the_pool() -> Result<()> {
    let pool = Arc::new(BuffersPool::new(2));
    let shared: Arc<dyn BufferPool> = pool.clone();
    let mut builder = builder(BatchConfig::default(), shared)?;

    builder.add_payload(0, paragraph(), Ack(0));
    let first = builder.flush()?.expect("first batch");
    let capacity = first.frame.capacity();

    assert!(pool.put_buffer(first.frame));
    assert_eq!(pool.len(), 1);

    builder.add_payload(1, sentence(), Ack(1));
    let second = builder.flush()?.expect("second batch");

    assert!(pool.is_empty());
    assert!(second.frame.capacity() >= capacity);
    assert_eq!(decode(second)?.callbacks, vec![Ack(1)]);

    Ok(())
}

#[test]
fn builders_can_share_a_pool_across_threads() -> Result<()> {
    let pool = Arc::new(BuffersPool::new(16));
    for _ in 0..16 {
        pool.put_buffer(Buffer::with_capacity(8 * 1024));
    }

    let workers: Vec<_> = (0..4u64)
        .map(|producer| {
            let shared: Arc<dyn BufferPool> = pool.clone();
            std::thread::spawn(move || -> pulse_std::errors::Result<usize> {
                let mut builder = builder(BatchConfig::default(), shared)?;
                let mut flushed = 0;

                for round in 0..8 {
                    builder.add_payload(producer * 100 + round, sentence(), Ack(round));
                    if let Some(batch) = builder.flush()? {
                        decode(batch)?;
                        flushed += 1;
                    }
                }

                Ok(flushed)
            })
        })
        .collect();

    let mut total = 0;
    for worker in workers {
        total += worker.join().expect("producer thread panicked")?;
    }

    assert_eq!(total, 32);
    assert!(pool.is_empty());

    Ok(())
}

#[test]
fn snappy_is_refused_up_front() {
    let config = BatchConfig::default().compression(CompressionType::Snappy);

    assert!(builder(config, BuffersPool::unpooled()).is_err());
}
