use crate::{
    DnsError, DnsMessage, DnsMessageHeader, DnsName, DnsOpCode, DnsReader, DnsRecord,
    DnsResponseCode, DnsType, MAX_UDP_MESSAGE_LEN,
};
use fixed_buffer::FixedBuf;
use log::{debug, warn};
use multimap::MultiMap;
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::Duration;

/// Answers `request` from `records`.
///
/// Returns `NXDOMAIN` when a question's name has no records at all, and `NOERROR` with no
/// answers when the name exists but has no record of the requested type.
/// A `CNAME` at the name answers every type.
///
/// # Errors
/// Returns `Err` when `request` is a response or has no question.
pub fn process_request(
    records: &MultiMap<DnsName, DnsRecord>,
    request: &DnsMessage,
) -> Result<DnsMessage, DnsError> {
    if request.header.is_response {
        return Err(DnsError::NotARequest);
    }
    match request.header.op_code {
        DnsOpCode::Query => {}
        DnsOpCode::Status => return Ok(request.response(DnsResponseCode::NoError)),
        DnsOpCode::InverseQuery | DnsOpCode::Reserved(_) => {
            return Ok(request.response(DnsResponseCode::NotImplemented))
        }
    }
    if request.questions.is_empty() {
        return Err(DnsError::NoQuestion);
    }
    let mut response = request.response(DnsResponseCode::NoError);
    for question in &request.questions {
        let at_name = match records.get_vec(&question.name) {
            Some(at_name) => at_name,
            None => {
                response.header.response_code = DnsResponseCode::NameError;
                continue;
            }
        };
        response.answers.extend(
            at_name
                .iter()
                .filter(|record| record.class == question.class)
                .filter(|record| record.typ() == question.typ || record.typ() == DnsType::CNAME)
                .cloned(),
        );
    }
    Ok(response)
}

fn format_error(header: &DnsMessageHeader) -> DnsMessage {
    DnsMessage {
        header: header.response(DnsResponseCode::FormatError),
        questions: Vec::new(),
        answers: Vec::new(),
        name_servers: Vec::new(),
        additional: Vec::new(),
    }
}

/// Decodes a request datagram and encodes the response.
///
/// Requests that do not decode get a `FORMERR` response, when their header is readable.
/// Responses that do not fit in 512 bytes are cut down to the question with the TC bit set.
///
/// > Messages carried by UDP are restricted to 512 bytes (not counting the IP
/// > or UDP headers).  Longer messages are truncated and the TC bit is set in
/// > the header.
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1>
///
/// # Errors
/// Returns `Err` when the datagram should be dropped without a response.
pub fn process_datagram(
    records: &MultiMap<DnsName, DnsRecord>,
    bytes: &[u8],
) -> Result<FixedBuf<MAX_UDP_MESSAGE_LEN>, DnsError> {
    let response = match DnsMessage::parse(bytes) {
        Ok(request) => match process_request(records, &request) {
            Ok(response) => response,
            Err(DnsError::NoQuestion) => format_error(&request.header),
            Err(e) => return Err(e),
        },
        Err(e) => {
            let header = DnsMessageHeader::read(&mut DnsReader::new(bytes))?;
            if header.is_response {
                return Err(DnsError::NotARequest);
            }
            debug!("malformed request id={}: {}", header.id, e);
            format_error(&header)
        }
    };
    let mut out: FixedBuf<MAX_UDP_MESSAGE_LEN> = FixedBuf::new();
    match response.write(&mut out) {
        Ok(()) => Ok(out),
        Err(DnsError::ResponseBufferFull) => {
            let mut truncated = response;
            truncated.header.truncated = true;
            truncated.answers.clear();
            truncated.name_servers.clear();
            truncated.additional.clear();
            let mut out: FixedBuf<MAX_UDP_MESSAGE_LEN> = FixedBuf::new();
            truncated.write(&mut out)?;
            Ok(out)
        }
        Err(e) => Err(e),
    }
}

/// Answers queries on `sock` from `records` until `permit` is revoked.
///
/// Checks the permit every 500ms.
///
/// # Errors
/// Returns `Err` when socket operations fail.
pub fn serve_udp(
    permit: &permit::Permit,
    sock: &UdpSocket,
    records: &[DnsRecord],
) -> Result<(), String> {
    sock.set_read_timeout(Some(Duration::from_millis(500)))
        .map_err(|e| format!("error setting socket read timeout: {}", e))?;
    let local_addr = sock
        .local_addr()
        .map_err(|e| format!("error getting socket local address: {}", e))?;
    let records: MultiMap<DnsName, DnsRecord> = records
        .iter()
        .map(|record| (record.name.clone(), record.clone()))
        .collect();
    debug!("serving {} names on {}", records.len(), local_addr);
    while !permit.is_revoked() {
        let mut buf: FixedBuf<MAX_UDP_MESSAGE_LEN> = FixedBuf::new();
        let addr = match sock.recv_from(buf.writable()) {
            Ok((len, addr)) => {
                buf.wrote(len);
                addr
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                continue
            }
            Err(e) => return Err(format!("error reading socket {:?}: {}", local_addr, e)),
        };
        let out = match process_datagram(&records, buf.readable()) {
            Ok(out) => out,
            Err(e) => {
                warn!("dropping {} byte datagram from {}: {}", buf.len(), addr, e);
                continue;
            }
        };
        debug!("sending {} byte response to {}", out.len(), addr);
        let sent_len = sock
            .send_to(out.readable(), addr)
            .map_err(|e| format!("error sending response to {:?}: {}", addr, e))?;
        if sent_len != out.len() {
            return Err(format!(
                "sent only {} bytes of {} byte response to {:?}",
                sent_len,
                out.len(),
                addr
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DnsQuestion;

    fn records() -> MultiMap<DnsName, DnsRecord> {
        [
            DnsRecord::new_a("aaa.example.com", "10.0.0.1").unwrap(),
            DnsRecord::new_a("aaa.example.com", "10.0.0.2").unwrap(),
            DnsRecord::new_aaaa("aaa.example.com", "2001:db8::1").unwrap(),
            DnsRecord::new_cname("bbb.example.com", "aaa.example.com").unwrap(),
        ]
        .into_iter()
        .map(|record| (record.name.clone(), record))
        .collect()
    }

    fn query(name: &str, typ: &str) -> DnsMessage {
        DnsMessage::query(0x9A9A, DnsQuestion::parse(name, typ).unwrap())
    }

    fn encode(message: &DnsMessage) -> Vec<u8> {
        let mut out: FixedBuf<512> = FixedBuf::new();
        message.write(&mut out).unwrap();
        out.readable().to_vec()
    }

    #[test]
    fn test_answers() {
        let request = query("AAA.example.com", "A");
        let response = process_request(&records(), &request).unwrap();
        assert!(response.answers_query(&request));
        assert!(response.header.authoritative_answer);
        assert!(response.header.recursion_desired);
        assert!(!response.header.recursion_available);
        assert_eq!(DnsResponseCode::NoError, response.header.response_code);
        assert_eq!(
            vec![
                DnsRecord::new_a("aaa.example.com", "10.0.0.1").unwrap(),
                DnsRecord::new_a("aaa.example.com", "10.0.0.2").unwrap(),
            ],
            response.answers
        );
    }

    #[test]
    fn test_cname() {
        let response = process_request(&records(), &query("bbb.example.com", "A")).unwrap();
        assert_eq!(
            vec![DnsRecord::new_cname("bbb.example.com", "aaa.example.com").unwrap()],
            response.answers
        );
    }

    #[test]
    fn test_not_found() {
        let response = process_request(&records(), &query("ccc.example.com", "A")).unwrap();
        assert_eq!(DnsResponseCode::NameError, response.header.response_code);
        assert!(response.answers.is_empty());
        let response = process_request(&records(), &query("aaa.example.com", "MX")).unwrap();
        assert_eq!(DnsResponseCode::NoError, response.header.response_code);
        assert!(response.answers.is_empty());
    }

    #[test]
    fn test_op_codes() {
        let mut request = query("aaa.example.com", "A");
        request.header.op_code = DnsOpCode::Status;
        let response = process_request(&records(), &request).unwrap();
        assert_eq!(DnsResponseCode::NoError, response.header.response_code);
        assert_eq!(DnsOpCode::Status, response.header.op_code);
        assert!(response.answers.is_empty());
        request.header.op_code = DnsOpCode::InverseQuery;
        assert_eq!(
            DnsResponseCode::NotImplemented,
            process_request(&records(), &request)
                .unwrap()
                .header
                .response_code
        );
        request.header.op_code = DnsOpCode::Reserved(9);
        assert_eq!(
            DnsResponseCode::NotImplemented,
            process_request(&records(), &request)
                .unwrap()
                .header
                .response_code
        );
    }

    #[test]
    fn test_bad_requests() {
        let mut request = query("aaa.example.com", "A");
        request.header.is_response = true;
        assert_eq!(
            Err(DnsError::NotARequest),
            process_request(&records(), &request)
        );
        assert_eq!(
            Err(DnsError::NotARequest),
            process_datagram(&records(), &encode(&request)).map(|_| ())
        );
        request.header.is_response = false;
        request.questions.clear();
        assert_eq!(
            Err(DnsError::NoQuestion),
            process_request(&records(), &request)
        );
        let response = process_datagram(&records(), &encode(&request)).unwrap();
        assert_eq!(
            &[0x9A, 0x9A, 0x85, 0x01, 0, 0, 0, 0, 0, 0, 0, 0],
            response.readable()
        );
    }

    #[test]
    fn test_malformed_datagram() {
        let mut bytes = encode(&query("aaa.example.com", "A"));
        bytes.push(0);
        let response = process_datagram(&records(), &bytes).unwrap();
        let response = DnsMessage::parse(response.readable()).unwrap();
        assert_eq!(0x9A9A, response.header.id);
        assert_eq!(DnsResponseCode::FormatError, response.header.response_code);
        assert!(response.questions.is_empty());
        assert_eq!(
            Err(DnsError::Truncated),
            process_datagram(&records(), &bytes[..11]).map(|_| ())
        );
    }

    #[test]
    fn test_truncation() {
        let records: MultiMap<DnsName, DnsRecord> = (0..40)
            .map(|n| {
                let record =
                    DnsRecord::new_a("aaa.example.com", &format!("10.0.0.{}", n)).unwrap();
                (record.name.clone(), record)
            })
            .collect();
        let request = query("aaa.example.com", "A");
        let response = process_datagram(&records, &encode(&request)).unwrap();
        let response = DnsMessage::parse(response.readable()).unwrap();
        assert!(response.header.truncated);
        assert!(response.answers_query(&request));
        assert!(response.answers.is_empty());
        assert_eq!(DnsResponseCode::NoError, response.header.response_code);
    }
}
