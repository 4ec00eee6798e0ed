/// Public DNSBL zones queried when no zone list is configured.
///
/// Order matters only for seeding; hits are reported in arrival order.
pub const DEFAULT_ZONES: &[&str] = &[
    "zen.spamhaus.org",
    "b.barracudacentral.org",
    "bl.spamcop.net",
    "cbl.abuseat.org",
    "dnsbl.sorbs.net",
    "spam.dnsbl.sorbs.net",
    "psbl.surriel.com",
    "dnsbl-1.uceprotect.net",
    "dnsbl-2.uceprotect.net",
    "dnsbl-3.uceprotect.net",
    "ix.dnsbl.manitu.net",
    "bl.mailspike.net",
    "z.mailspike.net",
    "truncate.gbudb.net",
    "dnsbl.dronebl.org",
    "db.wpbl.info",
    "all.s5h.net",
    "spam.spamrats.com",
    "dyna.spamrats.com",
    "noptr.spamrats.com",
    "bl.0spam.org",
    "ubl.unsubscore.com",
    "bl.blocklist.de",
    "dnsbl.spfbl.net",
    "bl.nordspam.com",
    "rbl.interserver.net",
    "dnsbl.kempt.net",
    "spamsources.fabel.dk",
    "hostkarma.junkemailfilter.com",
    "backscatter.spameatingmonkey.net",
];

pub fn default_zones() -> Vec<String> {
    DEFAULT_ZONES.iter().map(|z| z.to_string()).collect()
}
