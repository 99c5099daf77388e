//! Tests for fragment merging, ordered pops and byte-cap enforcement.

use rstest::{fixture, rstest};
use tracing_test::traced_test;

use super::test_helpers::{capped, fragment, legacy, nz, whole};
use crate::{
    handshake::{
        BufferError,
        ErrorKind,
        FragmentBuffer,
        FragmentError,
        FragmentHeader,
        HandshakeType,
        MessageSequence,
        PushOutcome,
        PushReport,
    },
    record::{ContentType, Epoch, ProtocolVersion, RecordError, RecordHeader, RecordSequence},
};

const BODY: [u8; 15] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];

#[fixture]
fn buffer() -> FragmentBuffer { FragmentBuffer::default() }

fn push(buffer: &mut FragmentBuffer, epoch: u16, payload: &[u8]) -> PushReport {
    match buffer
        .push(ContentType::Handshake, Epoch::new(epoch), payload)
        .expect("push accepted")
    {
        PushOutcome::Handshake(report) => report,
        PushOutcome::NotHandshake => panic!("handshake record was not consumed"),
    }
}

fn record(content_type: ContentType, epoch: u16, payload: &[u8]) -> Vec<u8> {
    let header = RecordHeader {
        content_type,
        version: ProtocolVersion::DTLS_1_2,
        epoch: Epoch::new(epoch),
        sequence: RecordSequence::default(),
        length: u16::try_from(payload.len()).expect("payload fits in a record"),
    };
    let mut out = header.encode().to_vec();
    out.extend_from_slice(payload);
    out
}

fn thirds() -> [Vec<u8>; 3] {
    [
        fragment(11, 15, 0, 0, &BODY[0..5]),
        fragment(11, 15, 0, 5, &BODY[5..10]),
        fragment(11, 15, 0, 10, &BODY[10..15]),
    ]
}

#[rstest]
#[case(0)]
#[case(3)]
fn single_fragment_round_trips_with_epoch(mut buffer: FragmentBuffer, #[case] epoch: u16) {
    let payload = whole(3, 0, &[0xfe, 0xff, 0x00]);
    let report = push(&mut buffer, epoch, &payload);
    assert_eq!(report.fragments(), 1);
    assert_eq!(report.new_bytes(), 3);
    assert_eq!(report.completed_messages(), 1);

    let message = buffer.pop().expect("message complete");
    assert_eq!(message.as_bytes(), payload.as_slice());
    assert_eq!(message.body(), &[0xfe, 0xff, 0x00]);
    assert_eq!(message.epoch(), Epoch::new(epoch));
    assert_eq!(message.msg_type(), HandshakeType::HELLO_VERIFY_REQUEST);
    assert!(message.header().is_unfragmented());
    assert!(buffer.pop().is_none());
}

#[rstest]
#[case::in_order([0, 1, 2])]
#[case::reversed([2, 1, 0])]
#[case::middle_first([1, 0, 2])]
#[case::last_first([2, 0, 1])]
fn fragments_reassemble_in_any_order(mut buffer: FragmentBuffer, #[case] order: [usize; 3]) {
    let parts = thirds();
    for (step, index) in order.into_iter().enumerate() {
        assert!(buffer.pop().is_none(), "message must not complete early");
        let report = push(&mut buffer, 0, &parts[index]);
        assert_eq!(report.completed_messages(), usize::from(step == 2));
    }

    let message = buffer.pop().expect("message complete");
    assert_eq!(message.body(), &BODY);
    let header = message.header();
    assert_eq!(header.length, 15);
    assert_eq!(header.fragment_offset, 0);
    assert_eq!(header.fragment_length, 15);
}

#[rstest]
fn multiple_messages_in_one_payload_pop_in_sequence(mut buffer: FragmentBuffer) {
    let messages: Vec<Vec<u8>> = (0..3).map(|seq| whole(3, seq, &[0xfe, 0xff, 1, 1])).collect();
    let payload = messages.concat();

    let report = push(&mut buffer, 0, &payload);
    assert_eq!(report.fragments(), 3);
    assert_eq!(report.completed_messages(), 3);
    assert_eq!(buffer.ready_len(), 3);

    for expected in &messages {
        let message = buffer.pop().expect("message ready");
        assert_eq!(message.as_bytes(), expected.as_slice());
    }
    assert!(buffer.pop().is_none());
}

#[rstest]
fn pop_returns_messages_in_sequence_order(mut buffer: FragmentBuffer) {
    push(&mut buffer, 0, &whole(1, 2, &[2]));
    push(&mut buffer, 0, &whole(1, 0, &[0]));
    push(&mut buffer, 0, &whole(1, 1, &[1]));

    let order: Vec<u16> = std::iter::from_fn(|| buffer.pop())
        .map(|m| m.message_seq().get())
        .collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[rstest]
fn duplicate_fragments_do_not_change_bytes_or_accounting(mut buffer: FragmentBuffer) {
    let [first, second, third] = thirds();
    push(&mut buffer, 0, &first);
    let charged = buffer.buffered_bytes();
    assert_eq!(charged, FragmentHeader::LEN + 15);

    let report = push(&mut buffer, 0, &first);
    assert!(report.is_retransmit());
    assert_eq!(buffer.buffered_bytes(), charged);

    let overlapping = fragment(11, 15, 0, 3, &BODY[3..12]);
    let report = push(&mut buffer, 0, &overlapping);
    assert_eq!(report.new_bytes(), 7);
    assert_eq!(buffer.buffered_bytes(), charged);

    push(&mut buffer, 0, &third);
    push(&mut buffer, 0, &second);
    let message = buffer.pop().expect("message complete");
    assert_eq!(message.body(), &BODY);
    assert_eq!(buffer.buffered_bytes(), 0);
}

#[rstest]
fn epoch_is_fixed_by_first_fragment(mut buffer: FragmentBuffer) {
    let [first, second, third] = thirds();
    push(&mut buffer, 1, &second);
    push(&mut buffer, 2, &first);
    push(&mut buffer, 3, &third);
    assert_eq!(buffer.pop().expect("complete").epoch(), Epoch::new(1));
}

#[rstest]
fn non_handshake_records_are_not_consumed(mut buffer: FragmentBuffer) {
    let payload = whole(1, 0, &[1, 2, 3]);
    for content_type in [
        ContentType::ApplicationData,
        ContentType::Alert,
        ContentType::ChangeCipherSpec,
        ContentType::Unknown(0),
    ] {
        let outcome = buffer
            .push(content_type, Epoch::new(0), &payload)
            .expect("non-handshake push never fails");
        assert_eq!(outcome, PushOutcome::NotHandshake);
    }
    assert_eq!(buffer.buffered_bytes(), 0);
    assert!(buffer.pop().is_none());
}

#[test]
fn overflow_is_rejected_and_leaves_pending_data_poppable() {
    let [first, second, third] = thirds();
    let mut buffer = capped(FragmentHeader::LEN + 15 + FragmentHeader::LEN + 3);
    push(&mut buffer, 0, &first);
    push(&mut buffer, 0, &second);
    let before = buffer.buffered_bytes();

    let err = buffer
        .push(ContentType::Handshake, Epoch::new(0), &whole(1, 1, &[0; 4]))
        .expect_err("message exceeds remaining headroom");
    assert_eq!(
        err,
        BufferError::Overflow {
            attempted: before + FragmentHeader::LEN + 4,
            limit: nz(FragmentHeader::LEN + 15 + FragmentHeader::LEN + 3),
        }
    );
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert_eq!(buffer.buffered_bytes(), before);

    push(&mut buffer, 0, &third);
    let message = buffer.pop().expect("pending message still completes");
    assert_eq!(message.body(), &BODY);

    push(&mut buffer, 0, &whole(1, 1, &[0; 4]));
    assert!(buffer.pop().is_some(), "headroom recovered after pop");
}

#[test]
fn overflow_admits_push_that_exactly_fills_cap() {
    let mut buffer = capped(FragmentHeader::LEN + 4);
    push(&mut buffer, 0, &whole(1, 0, &[0; 4]));
    assert_eq!(buffer.buffered_bytes(), FragmentHeader::LEN + 4);
}

#[test]
fn overflow_rejects_whole_payload_atomically() {
    let mut buffer = capped(64);
    let mut payload = whole(1, 0, &[0; 8]);
    payload.extend(whole(1, 1, &[0; 40]));

    let err = buffer
        .push(ContentType::Handshake, Epoch::new(0), &payload)
        .expect_err("second message overflows");
    assert!(matches!(err, BufferError::Overflow { .. }));
    assert_eq!(buffer.buffered_bytes(), 0);
    assert!(buffer.pop().is_none(), "first message must not be admitted");
}

#[test]
fn huge_declared_length_is_refused_before_allocation() {
    let mut buffer = capped(1024);
    let payload = fragment(11, 0x00FF_FFFF, 0, 0, &[1, 2, 3]);
    let err = buffer
        .push(ContentType::Handshake, Epoch::new(0), &payload)
        .expect_err("declared length exceeds cap");
    assert!(matches!(err, BufferError::Overflow { .. }));
    assert_eq!(buffer.pending_len(), 0);
}

#[rstest]
fn malformed_fragment_rejects_whole_payload(mut buffer: FragmentBuffer) {
    let mut payload = whole(1, 0, &[1, 2]);
    let mut broken = fragment(1, 8, 1, 0, &[1, 2, 3, 4, 5, 6]);
    broken.truncate(FragmentHeader::LEN + 2);
    payload.extend(broken);

    let err = buffer
        .push(ContentType::Handshake, Epoch::new(0), &payload)
        .expect_err("overrun must be rejected");
    assert_eq!(
        err,
        BufferError::Fragment(FragmentError::BodyOverrun {
            message_seq: MessageSequence::new(1),
            declared: 6,
            available: 2,
        })
    );
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(buffer.pop().is_none());
    assert_eq!(buffer.buffered_bytes(), 0);
}

#[rstest]
fn out_of_bounds_fragment_is_malformed(mut buffer: FragmentBuffer) {
    let header = FragmentHeader {
        msg_type: HandshakeType::CERTIFICATE,
        length: 4,
        message_seq: MessageSequence::new(0),
        fragment_offset: 3,
        fragment_length: 2,
    };
    let mut payload = header.encode().expect("fits").to_vec();
    payload.extend_from_slice(&[7, 7]);

    let err = buffer
        .push(ContentType::Handshake, Epoch::new(0), &payload)
        .expect_err("fragment past end of message");
    assert!(matches!(
        err,
        BufferError::Fragment(FragmentError::FragmentOutOfBounds { .. })
    ));
}

#[rstest]
fn conflicting_total_length_is_rejected(mut buffer: FragmentBuffer) {
    push(&mut buffer, 0, &fragment(11, 15, 0, 0, &BODY[0..5]));
    let before = buffer.buffered_bytes();

    let err = buffer
        .push(
            ContentType::Handshake,
            Epoch::new(0),
            &fragment(11, 20, 0, 5, &BODY[5..10]),
        )
        .expect_err("total length disagrees with first fragment");
    assert_eq!(
        err,
        BufferError::TotalLengthMismatch {
            message_seq: MessageSequence::new(0),
            expected: 15,
            found: 20,
        }
    );
    assert_eq!(err.kind(), ErrorKind::SequenceMismatch);
    assert_eq!(buffer.buffered_bytes(), before);
    assert_eq!(buffer.pending_len(), 1);
}

#[rstest]
fn conflicting_total_within_one_payload_is_rejected(mut buffer: FragmentBuffer) {
    let mut payload = fragment(11, 15, 4, 0, &BODY[0..5]);
    payload.extend(fragment(11, 10, 4, 5, &BODY[5..10]));

    let err = buffer
        .push(ContentType::Handshake, Epoch::new(0), &payload)
        .expect_err("fragments disagree");
    assert!(matches!(err, BufferError::TotalLengthMismatch { .. }));
    assert_eq!(buffer.pending_len(), 0);
}

#[rstest]
fn conflicting_message_type_is_rejected(mut buffer: FragmentBuffer) {
    push(&mut buffer, 0, &fragment(11, 15, 0, 0, &BODY[0..5]));
    let err = buffer
        .push(
            ContentType::Handshake,
            Epoch::new(0),
            &fragment(12, 15, 0, 5, &BODY[5..10]),
        )
        .expect_err("type disagrees with first fragment");
    assert_eq!(
        err,
        BufferError::MessageTypeMismatch {
            message_seq: MessageSequence::new(0),
            expected: HandshakeType::CERTIFICATE,
            found: HandshakeType::SERVER_KEY_EXCHANGE,
        }
    );
}

#[rstest]
fn empty_message_completes_under_strict_policy(mut buffer: FragmentBuffer) {
    let payload = whole(14, 0, &[]);
    let report = push(&mut buffer, 0, &payload);
    assert_eq!(report.completed_messages(), 1);
    assert!(push(&mut buffer, 0, &payload).is_retransmit());
    let message = buffer.pop().expect("empty message is complete");
    assert!(message.body().is_empty());
    assert_eq!(message.as_bytes(), payload.as_slice());
}

#[rstest]
fn lone_zero_length_fragment_never_completes_under_strict_policy(mut buffer: FragmentBuffer) {
    let chunk = fragment(0, 1, 0, 0, &[]);
    let payload = chunk.repeat(200);

    let report = push(&mut buffer, 0, &payload);
    assert_eq!(report.fragments(), 200);
    assert_eq!(report.new_bytes(), 0);
    assert!(buffer.pop().is_none());
    assert_eq!(buffer.pending_len(), 1);

    push(&mut buffer, 0, &fragment(0, 1, 0, 0, &[0x42]));
    assert_eq!(buffer.pop().expect("now complete").body(), &[0x42]);
}

#[test]
fn lone_zero_length_fragment_completes_zero_filled_under_legacy_policy() {
    let mut buffer = legacy();
    let mut payload = fragment(0, 1, 0, 0, &[]);
    payload.push(0x00);

    push(&mut buffer, 0, &payload);
    let message = buffer.pop().expect("legacy rule completes the message");
    assert_eq!(
        message.as_bytes(),
        &[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]
    );
    assert!(buffer.pop().is_none());
}

#[test]
fn duplicate_zero_length_fragment_keeps_legacy_message_ready() {
    let mut buffer = legacy();
    let payload = fragment(0, 1, 0, 0, &[]);

    let first = push(&mut buffer, 0, &payload);
    assert_eq!(first.completed_messages(), 1);
    assert_eq!(buffer.ready_len(), 1);

    let again = push(&mut buffer, 0, &payload);
    assert!(again.is_retransmit());
    assert_eq!(buffer.ready_len(), 1);

    let message = buffer.pop().expect("duplicate must not undo completion");
    assert_eq!(message.body(), &[0x00]);
}

#[test]
fn legacy_shortcut_ignored_once_body_bytes_arrived() {
    let mut buffer = legacy();
    push(&mut buffer, 0, &fragment(0, 4, 0, 0, &[1, 2]));
    push(&mut buffer, 0, &fragment(0, 4, 0, 0, &[]));
    assert!(
        buffer.pop().is_none(),
        "partial body must still be completed by real bytes"
    );
    push(&mut buffer, 0, &fragment(0, 4, 0, 2, &[3, 4]));
    assert_eq!(buffer.pop().expect("complete").body(), &[1, 2, 3, 4]);
}

#[test]
fn complete_legacy_message_ignores_later_fragments() {
    let mut buffer = legacy();
    push(&mut buffer, 0, &fragment(0, 2, 0, 0, &[]));
    let report = push(&mut buffer, 0, &fragment(0, 2, 0, 0, &[7, 7]));
    assert_eq!(report.new_bytes(), 0);
    assert_eq!(buffer.pop().expect("already complete").body(), &[0, 0]);
}

#[rstest]
fn fragments_of_popped_messages_are_stale(mut buffer: FragmentBuffer) {
    let payload = whole(1, 0, &[5, 6]);
    push(&mut buffer, 0, &payload);
    buffer.pop().expect("complete");
    assert_eq!(buffer.next_sequence(), Some(MessageSequence::new(1)));

    let report = push(&mut buffer, 0, &payload);
    assert_eq!(report.stale_fragments(), 1);
    assert!(report.is_retransmit());
    assert_eq!(buffer.buffered_bytes(), 0);
    assert!(buffer.pop().is_none());
}

#[rstest]
fn later_complete_message_waits_for_earlier_one(mut buffer: FragmentBuffer) {
    let mut popped = Vec::new();
    let mut drain = |buffer: &mut FragmentBuffer| {
        while let Some(message) = buffer.pop() {
            popped.push(message.message_seq().get());
        }
    };

    push(&mut buffer, 0, &fragment(11, 15, 0, 0, &BODY[0..5]));
    drain(&mut buffer);
    push(&mut buffer, 0, &whole(14, 1, &[]));
    drain(&mut buffer);
    assert_eq!(buffer.ready_len(), 1, "sequence 1 is complete but held back");

    let report = push(&mut buffer, 0, &fragment(11, 15, 0, 5, &BODY[5..15]));
    assert_eq!(report.stale_fragments(), 0);
    assert_eq!(report.completed_messages(), 1);
    drain(&mut buffer);

    assert_eq!(popped, vec![0, 1]);
    assert_eq!(buffer.buffered_bytes(), 0);
}

#[rstest]
fn pop_waits_for_missing_first_message(mut buffer: FragmentBuffer) {
    push(&mut buffer, 0, &whole(2, 1, &[1]));
    assert!(buffer.pop().is_none());
    assert_eq!(buffer.next_sequence(), Some(MessageSequence::new(0)));

    push(&mut buffer, 0, &whole(1, 0, &[0]));
    assert_eq!(buffer.pop().expect("sequence 0").message_seq().get(), 0);
    assert_eq!(buffer.pop().expect("sequence 1").message_seq().get(), 1);
}

#[rstest]
fn next_sequence_is_none_after_last_sequence(mut buffer: FragmentBuffer) {
    for seq in 0..=u16::MAX {
        push(&mut buffer, 0, &whole(1, seq, &[]));
        buffer.pop().expect("complete");
    }
    assert_eq!(buffer.next_sequence(), None);
    assert!(buffer.pop().is_none());
    let report = push(&mut buffer, 0, &whole(1, 0, &[1]));
    assert_eq!(report.stale_fragments(), 1);
}

#[rstest]
fn push_datagram_routes_records(mut buffer: FragmentBuffer) {
    let mut datagram = record(ContentType::Handshake, 0, &whole(1, 0, &[1]));
    datagram.extend(record(ContentType::ApplicationData, 1, &[0xaa, 0xbb]));
    datagram.extend(record(ContentType::Handshake, 0, &whole(1, 1, &[2])));
    datagram.extend_from_slice(&[0, 0, 0]);

    let outcome = buffer.push_datagram(&datagram).expect("well-formed datagram");
    assert!(outcome.is_handshake());
    assert_eq!(outcome.handshake_records(), 2);
    assert_eq!(outcome.report().completed_messages(), 2);
    assert_eq!(outcome.trailing(), &[0, 0, 0]);

    let passthrough = outcome.passthrough();
    assert_eq!(passthrough.len(), 1);
    assert_eq!(passthrough[0].header.content_type, ContentType::ApplicationData);
    assert_eq!(passthrough[0].payload, &[0xaa, 0xbb]);

    assert_eq!(buffer.ready_len(), 2);
}

#[rstest]
fn push_datagram_keeps_records_merged_before_a_failure(mut buffer: FragmentBuffer) {
    let mut datagram = record(ContentType::Handshake, 0, &whole(1, 0, &[1]));
    let mut bad = RecordHeader {
        content_type: ContentType::Handshake,
        version: ProtocolVersion::DTLS_1_2,
        epoch: Epoch::new(0),
        sequence: RecordSequence::default(),
        length: 100,
    }
    .encode()
    .to_vec();
    bad.extend_from_slice(&[0; 10]);
    datagram.extend(bad);

    let err = buffer
        .push_datagram(&datagram)
        .expect_err("second record overruns");
    assert_eq!(
        err,
        BufferError::Record(RecordError::PayloadOverrun {
            declared: 100,
            available: 10,
        })
    );
    assert_eq!(buffer.pop().expect("first record kept").body(), &[1]);
}

#[rstest]
fn push_datagram_of_empty_input_is_a_no_op(mut buffer: FragmentBuffer) {
    let outcome = buffer.push_datagram(&[]).expect("empty datagram");
    assert!(!outcome.is_handshake());
    assert!(outcome.passthrough().is_empty());
    assert!(outcome.trailing().is_empty());
}

#[rstest]
#[traced_test]
fn rejected_pushes_are_logged(mut buffer: FragmentBuffer) {
    let payload = fragment(11, 0x00FF_FFFF, 0, 0, &[1]);
    let mut small = capped(16);
    small
        .push(ContentType::Handshake, Epoch::new(0), &payload)
        .expect_err("overflow");
    assert!(logs_contain("rejected handshake input"));
    assert!(logs_contain("overflow"));

    push(&mut buffer, 0, &whole(1, 0, &[1]));
    buffer.pop().expect("complete");
    assert!(logs_contain("handing out reassembled handshake message"));
}
