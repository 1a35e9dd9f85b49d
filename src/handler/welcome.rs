//! Help page served at `/`
//!
//! The `<start>`/`<end>` placeholders are HTML-escaped so browsers show them.

pub const WELCOME_HTML: &str = concat!(
    "Welcome to my Climate Analysis exercise!<br/>",
    "=====================================================<br/>",
    "Available Routes:<br/>",
    "-------------------<br/>",
    "Returns precipitation data for the past year<br/>",
    "/api/v1.0/precipitation<br/>",
    "---------------------------------------------<br/>",
    "Returns a list of the weather observation stations:<br/>",
    "/api/v1.0/stations<br/>",
    "---------------------------------------------<br/>",
    "Returns a list of the tobs for the most active stations for the last year of data:<br/> ",
    "/api/v1.0/tobs<br/>",
    "---------------------------------------------<br/><br/>",
    "Enter a start date to see the Max, Min and Ave temperature from the start date to the end of the dataset:<br/> ",
    "- format required is api link\\start date(yyyy-mm-dd)<br/><br/>",
    "/api/v1.0/from/&lt;start&gt;<br/>",
    "---------------------------------------------<br/><br/>",
    "Enter a start and an end date to see the Max, Min and Ave temperature in that date range: <br/>",
    "- format required is api link\\start date(yyyy-mm-dd)\\end date(yyy-mm-dd)<br/><br/>",
    "/api/v1.0/range/&lt;start&gt;/&lt;end&gt;",
);
