use criterion::{black_box, criterion_group, criterion_main, Criterion};
use krb5_locate::resolver::dns::parse_srv_response;

const QNAME: &str = "_kerberos._udp.EXAMPLE.COM.";

fn push_name(buf: &mut Vec<u8>, name: &str) {
    for label in name.split('.').filter(|label| !label.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
}

/// A response carrying `count` SRV answers in reverse priority order, so
/// every insert lands at the front.
fn response(count: u16) -> Vec<u8> {
    let mut msg = vec![0x12, 0x34, 0x81, 0x80, 0, 1];
    msg.extend_from_slice(&count.to_be_bytes());
    msg.extend_from_slice(&[0, 0, 0, 0]);
    push_name(&mut msg, QNAME);
    msg.extend_from_slice(&[0, 33, 0, 1]);

    for i in 0..count {
        let mut rdata = Vec::new();
        rdata.extend_from_slice(&(count - i).to_be_bytes());
        rdata.extend_from_slice(&i.to_be_bytes());
        rdata.extend_from_slice(&88u16.to_be_bytes());
        push_name(&mut rdata, &format!("kdc{i}.example.com"));

        msg.extend_from_slice(&[0xC0, 12, 0, 33, 0, 1]);
        msg.extend_from_slice(&300u32.to_be_bytes());
        msg.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        msg.extend_from_slice(&rdata);
    }
    msg
}

fn parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_srv_response");
    for count in [1u16, 8, 64] {
        let msg = response(count);
        group.bench_function(format!("{count} records"), |b| {
            b.iter(|| parse_srv_response(black_box(&msg)))
        });
    }
    group.finish();
}

criterion_group!(benches, parse);
criterion_main!(benches);
