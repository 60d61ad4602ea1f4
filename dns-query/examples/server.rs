// $ cargo run --package dns-query --example server
// $ cargo run --package dns-query -- example.com A

use dns_query::{DnsRecord, DEFAULT_PORT};
use permit::Permit;
use std::io::Read;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

fn main() {
    let permit = Permit::new();
    let serve_udp_permit = permit.new_sub();
    let sock =
        UdpSocket::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT)).unwrap();
    let addr = sock.local_addr().unwrap();
    println!("Bound UDP socket {}", addr);
    let records = vec![
        DnsRecord::new_a("example.com", "93.184.216.34")
            .unwrap()
            .with_ttl(3600),
        DnsRecord::new_aaaa("example.com", "2606:2800:220:1:248:1893:25c8:1946")
            .unwrap()
            .with_ttl(3600),
        DnsRecord::new_mx("example.com", 10, "mail.example.com").unwrap(),
        DnsRecord::new_txt("example.com", "v=spf1 -all").unwrap(),
        DnsRecord::new_cname("www.example.com", "example.com").unwrap(),
    ];
    let join_handle = std::thread::spawn(move || {
        dns_query::serve_udp(&serve_udp_permit, &sock, &records).unwrap();
    });
    println!("Press CTRL-D to stop.");
    while matches!(std::io::stdin().read(&mut [0u8]), Ok(1)) {}
    permit.revoke();
    join_handle.join().unwrap();
}
