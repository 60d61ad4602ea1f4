use crate::dns_name::NameOffsets;
use crate::{DnsError, DnsMessageHeader, DnsQuestion, DnsReader, DnsRecord, DnsResponseCode};
use core::fmt::{Display, Formatter};
use fixed_buffer::FixedBuf;

/// > All communications inside of the domain protocol are carried in a single format called a
/// > message.  The top level format of message is divided into 5 (some of which are empty in
/// > certain cases) sections shown below:
/// >
/// > ```text
/// >     +---------------------+
/// >     |        Header       |
/// >     +---------------------+
/// >     |       Question      | the question for the name server
/// >     +---------------------+
/// >     |        Answer       | RRs answering the question
/// >     +---------------------+
/// >     |      Authority      | RRs pointing toward an authority
/// >     +---------------------+
/// >     |      Additional     | RRs holding additional information
/// >     +---------------------+
/// > ```
///
/// <https://datatracker.ietf.org/doc/html/rfc1035#section-4.1>
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DnsMessage {
    pub header: DnsMessageHeader,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsRecord>,
    pub name_servers: Vec<DnsRecord>,
    pub additional: Vec<DnsRecord>,
}
impl DnsMessage {
    /// A standard query with one question and recursion desired.
    pub fn query(id: u16, question: DnsQuestion) -> Self {
        Self {
            header: DnsMessageHeader {
                question_count: 1,
                ..DnsMessageHeader::query(id)
            },
            questions: vec![question],
            answers: Vec::new(),
            name_servers: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// An empty response to `self` that repeats its questions.
    pub fn response(&self, response_code: DnsResponseCode) -> Self {
        Self {
            header: DnsMessageHeader {
                question_count: self.header.question_count,
                ..self.header.response(response_code)
            },
            questions: self.questions.clone(),
            answers: Vec::new(),
            name_servers: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Decodes a whole message.
    ///
    /// # Errors
    /// Returns an error when `bytes` is not exactly one well-formed message.
    pub fn parse(bytes: &[u8]) -> Result<Self, DnsError> {
        let mut reader = DnsReader::new(bytes);
        let header = DnsMessageHeader::read(&mut reader)?;
        let mut questions = Vec::new();
        for _ in 0..header.question_count {
            questions.push(DnsQuestion::read(&mut reader)?);
        }
        let mut read_records = |count: u16| -> Result<Vec<DnsRecord>, DnsError> {
            let mut records = Vec::new();
            for _ in 0..count {
                records.push(DnsRecord::read(&mut reader)?);
            }
            Ok(records)
        };
        let answers = read_records(header.answer_count)?;
        let name_servers = read_records(header.name_server_count)?;
        let additional = read_records(header.additional_count)?;
        if reader.remaining() != 0 {
            return Err(DnsError::TrailingBytes(reader.remaining()));
        }
        Ok(Self {
            header,
            questions,
            answers,
            name_servers,
            additional,
        })
    }

    /// Encodes the message.  The header counts come from the section lengths, not from
    /// `self.header`.
    ///
    /// # Errors
    /// Returns an error when a section has more than 65535 entries, a record cannot be encoded,
    /// or the message does not fit in `out`.
    pub fn write<const N: usize>(&self, out: &mut FixedBuf<N>) -> Result<(), DnsError> {
        let header = DnsMessageHeader {
            question_count: u16::try_from(self.questions.len())
                .map_err(|_| DnsError::TooManyQuestions)?,
            answer_count: u16::try_from(self.answers.len())
                .map_err(|_| DnsError::TooManyAnswers)?,
            name_server_count: u16::try_from(self.name_servers.len())
                .map_err(|_| DnsError::TooManyNameServers)?,
            additional_count: u16::try_from(self.additional.len())
                .map_err(|_| DnsError::TooManyAdditional)?,
            ..self.header.clone()
        };
        header.write(out)?;
        let mut offsets = NameOffsets::new();
        for question in &self.questions {
            question.write(out, &mut offsets)?;
        }
        for record in self
            .answers
            .iter()
            .chain(self.name_servers.iter())
            .chain(self.additional.iter())
        {
            record.write(out, &mut offsets)?;
        }
        Ok(())
    }

    /// Returns true when `self` is a response to `query`: same id, QR set, and the same
    /// questions.
    pub fn answers_query(&self, query: &DnsMessage) -> bool {
        self.header.id == query.header.id
            && self.header.is_response
            && self.questions == query.questions
    }
}
/// A `dig`-like dump, one line per field, question, and record.
impl Display for DnsMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        writeln!(f, "id {}", self.header.id)?;
        writeln!(f, "opcode {}", self.header.op_code)?;
        writeln!(f, "rcode {}", self.header.response_code)?;
        write!(f, "flags")?;
        for flag in self.header.flag_names() {
            write!(f, " {}", flag)?;
        }
        writeln!(f)?;
        writeln!(f, ";QUESTION")?;
        for question in &self.questions {
            writeln!(f, "{}", question)?;
        }
        for (title, records) in [
            (";ANSWER", &self.answers),
            (";AUTHORITY", &self.name_servers),
            (";ADDITIONAL", &self.additional),
        ] {
            writeln!(f, "{}", title)?;
            for record in records {
                writeln!(f, "{}", record)?;
            }
        }
        Ok(())
    }
}
